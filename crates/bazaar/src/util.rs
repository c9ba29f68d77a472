//! General-purpose helpers shared across pages.

use url::Url;

/// Format a minor-unit amount as a currency string, e.g. `NGN 7,500.00`.
pub fn format_currency(amount_cents: i64, currency: &str) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let cents = amount_cents.unsigned_abs();
    format!(
        "{sign}{currency} {}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(units: u64) -> String {
    let digits = units.to_string();
    let offset = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (index + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn capitalize_first_letter(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Structural email check, not full RFC validation.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Value of a query parameter in a URL string, percent-decoded.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(750_000, "NGN"), "NGN 7,500.00");
        assert_eq!(format_currency(185_000, "NGN"), "NGN 1,850.00");
        assert_eq!(format_currency(99, "USD"), "USD 0.99");
        assert_eq!(format_currency(-123_456, "USD"), "-USD 1,234.56");
        assert_eq!(format_currency(100_000_000, "NGN"), "NGN 1,000,000.00");
    }

    #[test]
    fn capitalization() {
        assert_eq!(capitalize_first_letter("ada"), "Ada");
        assert_eq!(capitalize_first_letter(""), "");
        assert_eq!(capitalize_first_letter("łukasz"), "Łukasz");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(!is_valid_email("buyer example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("buyer@example"));
        assert!(!is_valid_email("buyer@.com"));
    }

    #[test]
    fn query_parameters() {
        let url = "https://bazaar.test/shop?page=2&q=adire%20cloth";
        assert_eq!(query_param(url, "page").as_deref(), Some("2"));
        assert_eq!(query_param(url, "q").as_deref(), Some("adire cloth"));
        assert_eq!(query_param(url, "missing"), None);
    }
}
