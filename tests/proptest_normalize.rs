use calc_interpreter::{Environment, Lexer, Outcome, evaluate, normalize};
use num_bigint::BigInt;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Non-empty runs of signs, optionally padded with spaces.
fn sign_run() -> impl Strategy<Value = String> {
    "[+\\- ]{0,12}[+\\-][+\\- ]{0,12}"
}

/// Lines built from the characters the calculator cares about.
fn raw_line() -> impl Strategy<Value = String> {
    "[0-9a-z+\\-*/^()= \t]{0,40}"
}

fn operand() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000_000i64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn sign_runs_collapse_by_minus_parity(run in sign_run()) {
        let minuses = run.chars().filter(|&c| c == '-').count();
        let expected = if minuses % 2 == 1 { "-" } else { "+" };
        prop_assert_eq!(normalize(&run), expected);
    }

    #[test]
    fn normalize_is_idempotent(line in raw_line()) {
        let once = normalize(&line);
        prop_assert_eq!(normalize(&once), once.clone());
    }

    #[test]
    fn normalized_lines_have_no_adjacent_signs(line in raw_line()) {
        let normalized = normalize(&line);
        let bytes = normalized.as_bytes();
        for pair in bytes.windows(2) {
            prop_assert!(!matches!(pair, [b'+' | b'-', b'+' | b'-']), "{normalized:?}");
        }
    }

    #[test]
    fn tokens_concatenate_to_their_input(line in raw_line()) {
        let normalized = normalize(&line);
        let tokens: Vec<_> = Lexer::new(&normalized).collect();
        prop_assert!(tokens.iter().all(|token| !token.literal.is_empty()));
        let rebuilt: String = tokens.iter().map(|token| token.literal).collect();
        prop_assert_eq!(rebuilt, normalized);
    }

    #[test]
    fn arithmetic_matches_bigint(a in operand(), b in operand(), c in operand()) {
        let mut env = Environment::new();
        let (a, b, c) = (BigInt::from(a), BigInt::from(b), BigInt::from(c));

        let sum = evaluate(&format!("{a} + {b} * {c}"), &mut env);
        prop_assert_eq!(sum, Ok(Outcome::Value(&a + &b * &c)));

        let difference = evaluate(&format!("({a} - {b}) - {c}"), &mut env);
        prop_assert_eq!(difference, Ok(Outcome::Value(&a - &b - &c)));
    }

    #[test]
    fn variables_stand_in_for_their_values(a in operand(), b in operand()) {
        let mut env = Environment::new();
        evaluate(&format!("x = {a}"), &mut env).unwrap();
        evaluate(&format!("y = {b}"), &mut env).unwrap();
        prop_assert_eq!(
            evaluate("x * y - x", &mut env),
            Ok(Outcome::Value(BigInt::from(a) * BigInt::from(b) - BigInt::from(a)))
        );
    }
}
