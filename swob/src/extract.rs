//! Pull a single variable's value out of a token stream.

use crate::{Error, Result, Token};

/// Tokens between a variable's name and its value, inclusive of the value.
///
/// SWOB-ML writes `name`, `uom`, `value`; the unit is skipped.
const VALUE_OFFSET: u8 = 2;

/// Find the value of `variable` in the tokens.
///
/// A variable is named by an attribute whose *value* is `variable`; its
/// value is the attribute [`VALUE_OFFSET`] tokens later. If the variable appears
/// more than once, the last occurrence wins. Returns `None` if it never
/// appears.
pub fn extract<I>(tokens: I, variable: &str) -> Result<Option<f64>>
where
    I: IntoIterator<Item = Result<Token>>,
{
    let mut countdown: Option<u8> = None;
    let mut latest = None;
    for token in tokens {
        let token = token?;
        countdown = countdown.map(|c| c - 1);
        if matches!(&token, Token::Attr { value, .. } if value == variable) {
            tracing::trace!("found {} at {:?}", variable, token);
            countdown = Some(VALUE_OFFSET);
        }
        if countdown == Some(0) {
            countdown = None;
            // Only an attribute carries the value; a tag or text here is malformed.
            let Token::Attr { value: raw, .. } = &token else {
                return Err(Error::MissingValue {
                    variable: variable.to_owned(),
                });
            };
            let value = raw.trim().parse::<f64>().map_err(|_| Error::InvalidValue {
                variable: variable.to_owned(),
                value: raw.to_owned(),
            })?;
            tracing::debug!("{} = {}", variable, value);
            latest = Some(value);
        }
    }
    Ok(latest)
}
