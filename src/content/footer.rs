//! Contact details generated locally from the company name and address.

use crate::document::{Footer, FooterContent, MapSection};
use rand::Rng;

const PHONE_PREFIXES: [&str; 2] = ["+601", "+603"];
const PHONE_DIGITS: usize = 8;

pub fn generate<R: Rng + ?Sized>(company: &str, location: &str, rng: &mut R) -> FooterContent {
    let address = address(location);
    FooterContent {
        map: MapSection {
            map_src: map_embed_url(&address),
        },
        footer: Footer {
            info: vec![phone_number(rng), email(company), address],
        },
    }
}

pub fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut number = PHONE_PREFIXES[rng.gen_range(0..PHONE_PREFIXES.len())].to_string();
    for _ in 0..PHONE_DIGITS {
        let digit = rng.gen_range(0..10u8);
        number.push(char::from(b'0' + digit));
    }
    number
}

pub fn email(company: &str) -> String {
    let local: String = company
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ')
        .collect();
    format!("info@{}.com", local)
}

/// Location with its list numbering removed (first occurrence only).
pub fn address(location: &str) -> String {
    location.replacen("1. ", "", 1)
}

pub fn map_embed_url(address: &str) -> String {
    let query = address.replace(' ', "%20").replace(',', "%2C");
    format!(
        "https://maps.google.com/maps?q={}&t=&z=10&ie=UTF8&iwloc=&output=embed",
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn phone_has_prefix_and_eight_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let phone = phone_number(&mut rng);
            assert_eq!(phone.len(), 12);
            assert!(phone.starts_with("+601") || phone.starts_with("+603"));
            assert!(phone[4..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn email_strips_spaces_and_lowercases() {
        assert_eq!(email("Acme Coffee Co"), "info@acmecoffeeco.com");
    }

    #[test]
    fn address_drops_leading_numbering_once() {
        assert_eq!(address("1. 12 Jalan Ampang"), "12 Jalan Ampang");
        assert_eq!(address("1. Unit 1. B"), "Unit 1. B");
        assert_eq!(address("12 Jalan Ampang"), "12 Jalan Ampang");
    }

    #[test]
    fn map_url_escapes_spaces_and_commas() {
        assert_eq!(
            map_embed_url("12 Jalan Ampang, Kuala Lumpur"),
            "https://maps.google.com/maps?q=12%20Jalan%20Ampang%2C%20Kuala%20Lumpur&t=&z=10&ie=UTF8&iwloc=&output=embed"
        );
    }

    #[test]
    fn footer_lists_phone_email_address() {
        let mut rng = StdRng::seed_from_u64(1);
        let content = generate("Acme", "1. 5 Main St, Springfield", &mut rng);
        let info = &content.footer.info;
        assert_eq!(info.len(), 3);
        assert_eq!(info[1], "info@acme.com");
        assert_eq!(info[2], "5 Main St, Springfield");
        assert!(content.map.map_src.contains("5%20Main%20St%2C%20Springfield"));
    }
}
