//! Normalization of the free-text identifiers staff type into the client form.

use regex::Regex;
use std::sync::LazyLock;

static NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("Invalid regex pattern"));

/// Removes every character that is not an ASCII digit.
pub fn digits(s: &str) -> String {
    NON_DIGIT.replace_all(s, "").into_owned()
}

/// Formats a CPF (11 digits) as `###.###.###-##` or a CNPJ (14 digits) as
/// `##.###.###/####-##`. Punctuation in the input is ignored when counting digits. Any other
/// number of digits returns the input unchanged.
pub fn format_tax_id(s: &str) -> String {
    let d = digits(s);
    match d.len() {
        11 => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        ),
        _ => s.to_string(),
    }
}

/// Formats a phone number with area code: 11 digits (mobile) as `(##) #####-####` and 10
/// digits (landline) as `(##) ####-####`. Any other number of digits returns the input
/// unchanged.
pub fn format_phone(s: &str) -> String {
    let d = digits(s);
    match d.len() {
        11 => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11]),
        10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10]),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits() {
        assert_eq!(digits("a1-2.3/4 5"), "12345");
        assert_eq!(digits(""), "");
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_tax_id("12345678901"), "123.456.789-01");
    }

    #[test]
    fn test_format_cpf_already_punctuated() {
        assert_eq!(format_tax_id("123.456.789-01"), "123.456.789-01");
        assert_eq!(format_tax_id(" 123 456 789 01 "), "123.456.789-01");
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_tax_id("05261064000160"), "05.261.064/0001-60");
        assert_eq!(format_tax_id("05.261.064/0001-60"), "05.261.064/0001-60");
    }

    #[test]
    fn test_format_tax_id_other_lengths_pass_through() {
        assert_eq!(format_tax_id("1234"), "1234");
        assert_eq!(format_tax_id("12.345"), "12.345");
        assert_eq!(format_tax_id("123456789012"), "123456789012");
        assert_eq!(format_tax_id(""), "");
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("35999817121"), "(35) 99981-7121");
        assert_eq!(format_phone("(35)3521-0000"), "(35) 3521-0000");
        assert_eq!(format_phone("999817121"), "999817121");
    }
}
