use std::borrow::Cow;
use std::thread;

use urlencoder::{decode, decode_with, encode, encode_with, is_unreserved, Spaces};

const SAMPLES: &[&str] = &[
	"",
	"plain",
	"a test &",
	"?test=a test",
	"100% sure + 1 = 2",
	"~tilde~ and *star*",
	"%#okékÉȢ smile!😁",
	"традиционное польское блюдо",
	"真正 cjk",
	"private \u{10FFFD} and \u{7F}\0 control",
	"emoji only 😁🎉👍🏽",
	"  leading and trailing  ",
	"+++",
];

fn hex_triplets(s: &str) -> Vec<u8> {
	s.split('%')
		.skip(1)
		.map(|t| u8::from_str_radix(&t[..2], 16).unwrap())
		.collect()
}

#[test]
fn decode_inverts_encode() {
	for sample in SAMPLES {
		assert_eq!(decode(&encode(sample)).unwrap(), *sample);
	}
}

#[test]
fn decode_inverts_encode_with_allow() {
	for allow in ["", "?=", "/:", "é", "~ "] {
		for sample in SAMPLES {
			let encoded = encode_with(sample, allow, Spaces::Percent);
			assert_eq!(decode(&encoded).unwrap(), *sample, "allow {allow:?}");
		}
	}
}

#[test]
fn plus_spaces_round_trip() {
	for sample in SAMPLES {
		let encoded = encode_with(sample, (), Spaces::Plus);
		assert!(!encoded.contains(' '));
		assert_eq!(decode_with(&encoded, Spaces::Plus).unwrap(), *sample);
	}
}

#[test]
fn encoded_output_is_form_safe() {
	for sample in SAMPLES {
		for c in encode(sample).chars() {
			assert!(is_unreserved(c) || c == '%', "{c:?} in encoding of {sample:?}");
		}
	}
}

#[test]
fn escapes_are_uppercase() {
	for sample in SAMPLES {
		let encoded = encode(sample);
		for triplet in encoded.split('%').skip(1) {
			assert!(triplet[..2]
				.bytes()
				.all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
		}
	}
}

#[test]
fn supplementary_character_is_four_triplets() {
	let emoji = "😁";
	let encoded = encode(emoji);
	assert_eq!(encoded, "%F0%9F%98%81");
	assert_eq!(hex_triplets(&encoded), emoji.as_bytes());
	assert_eq!(decode(&encoded).unwrap(), emoji);
}

#[test]
fn unreserved_text_is_not_copied() {
	let text = String::from("Only-Unreserved_Characters.0123456789");
	let encoded = encode(&text);
	match encoded {
		Cow::Borrowed(s) => assert_eq!(s.as_ptr(), text.as_ptr()),
		Cow::Owned(_) => panic!("unreserved text was copied"),
	}

	let decoded = decode(&text).unwrap();
	assert!(matches!(decoded, Cow::Borrowed(s) if std::ptr::eq(s, text.as_str())));
}

#[test]
fn concurrent_calls() {
	let handles: Vec<_> = (0..8)
		.map(|n| {
			thread::spawn(move || {
				for _ in 0..100 {
					for sample in SAMPLES {
						let spaces = if n % 2 == 0 { Spaces::Percent } else { Spaces::Plus };
						let encoded = encode_with(sample, (), spaces);
						assert_eq!(decode_with(&encoded, spaces).unwrap(), *sample);
					}
				}
			})
		})
		.collect();

	for handle in handles {
		handle.join().unwrap();
	}
}
