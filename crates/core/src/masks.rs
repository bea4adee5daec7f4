//! Keystroke masks for the registration form.
//!
//! Every mask is total and idempotent: it accepts any text, keeps only the
//! ASCII digits, truncates them to the pattern capacity and lays them out on
//! the pattern. Literal characters of the pattern are only emitted while more
//! digits follow, so partially typed values render as the user types them.

/// `###.###.###-##`
const CPF_PATTERN: &str = "###.###.###-##";
/// `(##) ####-####`, up to 10 digits.
const LANDLINE_PATTERN: &str = "(##) ####-####";
/// `(##) #####-####`, 11 digits.
const MOBILE_PATTERN: &str = "(##) #####-####";
/// `### #### #### ####`, the 15 digit Cartão Nacional de Saúde.
const SUS_CARD_PATTERN: &str = "### #### #### ####";

const SLOT: char = '#';

/// Strips every character that is not an ASCII digit.
pub fn number_mask(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Formats a CPF as `###.###.###-##`, dropping digits past the eleventh.
pub fn cpf_mask(input: &str) -> String {
    apply_pattern(&number_mask(input), CPF_PATTERN)
}

/// Formats a phone number as `(##) ####-####` or `(##) #####-####`.
///
/// Ten digits or fewer use the landline layout, eleven use the mobile layout.
pub fn phone_mask(input: &str) -> String {
    let digits = number_mask(input);
    let pattern = if digits.len() > pattern_capacity(LANDLINE_PATTERN) {
        MOBILE_PATTERN
    } else {
        LANDLINE_PATTERN
    };
    apply_pattern(&digits, pattern)
}

/// Formats a SUS card number as `### #### #### ####`.
pub fn sus_card_mask(input: &str) -> String {
    apply_pattern(&number_mask(input), SUS_CARD_PATTERN)
}

fn pattern_capacity(pattern: &str) -> usize {
    pattern.chars().filter(|c| *c == SLOT).count()
}

fn apply_pattern(digits: &str, pattern: &str) -> String {
    let mut remaining = digits.chars().take(pattern_capacity(pattern)).peekable();
    let mut out = String::with_capacity(pattern.len());

    for slot in pattern.chars() {
        if remaining.peek().is_none() {
            break;
        }
        if slot == SLOT {
            if let Some(d) = remaining.next() {
                out.push(d);
            }
        } else {
            out.push(slot);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_mask_keeps_digits_in_order() {
        assert_eq!(number_mask("123.456.789-09"), "12345678909");
        assert_eq!(number_mask("(11) 98765-4321"), "11987654321");
        assert_eq!(number_mask("a1b2c3"), "123");
        assert_eq!(number_mask(""), "");
        assert_eq!(number_mask("sem números"), "");
    }

    #[test]
    fn test_number_mask_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not accepted by the backend.
        assert_eq!(number_mask("١٢٣4"), "4");
    }

    #[test]
    fn test_cpf_mask_formats_progressively() {
        assert_eq!(cpf_mask("1"), "1");
        assert_eq!(cpf_mask("123"), "123");
        assert_eq!(cpf_mask("1234"), "123.4");
        assert_eq!(cpf_mask("1234567"), "123.456.7");
        assert_eq!(cpf_mask("1234567890"), "123.456.789-0");
        assert_eq!(cpf_mask("12345678909"), "123.456.789-09");
    }

    #[test]
    fn test_cpf_mask_truncates_excess_digits() {
        let masked = cpf_mask("1234567890999999");
        assert_eq!(masked, "123.456.789-09");
        assert_eq!(masked.len(), 14);
    }

    #[test]
    fn test_cpf_mask_is_idempotent() {
        for raw in ["", "9", "98765", "987.654.32", "98765432100", "987654321001234"] {
            let once = cpf_mask(raw);
            assert_eq!(cpf_mask(&once), once, "input {raw:?}");
            assert!(once.len() <= 14);
        }
    }

    #[test]
    fn test_phone_mask_mobile_and_landline() {
        assert_eq!(phone_mask("11987654321"), "(11) 98765-4321");
        assert_eq!(phone_mask("1133334444"), "(11) 3333-4444");
    }

    #[test]
    fn test_phone_mask_partial_input() {
        assert_eq!(phone_mask(""), "");
        assert_eq!(phone_mask("1"), "(1");
        assert_eq!(phone_mask("11"), "(11");
        assert_eq!(phone_mask("119"), "(11) 9");
        assert_eq!(phone_mask("119876"), "(11) 9876");
        assert_eq!(phone_mask("1198765"), "(11) 9876-5");
    }

    #[test]
    fn test_phone_mask_switches_layout_on_eleventh_digit() {
        assert_eq!(phone_mask("(11) 9876-54321"), "(11) 98765-4321");
        assert_eq!(phone_mask("(11) 98765-4321"), "(11) 98765-4321");
        assert_eq!(phone_mask("119876543219999"), "(11) 98765-4321");
    }

    #[test]
    fn test_phone_mask_is_idempotent() {
        for raw in ["1", "1133334444", "11987654321", "55 11 98765 4321"] {
            let once = phone_mask(raw);
            assert_eq!(phone_mask(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_sus_card_mask_groups_digits() {
        assert_eq!(sus_card_mask("898"), "898");
        assert_eq!(sus_card_mask("8980"), "898 0");
        assert_eq!(sus_card_mask("898001160660001"), "898 0011 6066 0001");
        assert_eq!(sus_card_mask("8980011606600019999"), "898 0011 6066 0001");
    }

    #[test]
    fn test_sus_card_mask_is_idempotent() {
        let once = sus_card_mask("898.0011.6066.0001");
        assert_eq!(once, "898 0011 6066 0001");
        assert_eq!(sus_card_mask(&once), once);
    }

    #[test]
    fn test_masks_strip_letters() {
        assert_eq!(cpf_mask("abc"), "");
        assert_eq!(phone_mask("tel: 11 3333 4444"), "(11) 3333-4444");
    }
}
