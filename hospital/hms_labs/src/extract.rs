//! Numeric extraction from free-text lab results.
//!
//! Result strings look like `"5.4 x10^9/L"`, `"Positive"` or `"< 0.5 mg/dL"`.
//! The first unsigned decimal in the text is taken as the value; everything
//! else (units, comparators, exponents) is ignored.

use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[^0-9]+")]
enum ResultToken {
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// First decimal number in `results`, or `None` when there is none.
pub fn extract_numeric(results: &str) -> Option<f64> {
    ResultToken::lexer(results).find_map(|tok| match tok {
        Ok(ResultToken::Number(v)) => Some(v),
        Err(()) => None,
    })
}
