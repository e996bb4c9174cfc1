//! Percent-encoding of URL components.
//!
//! This crate provides two transforms, [`encode`] and [`decode`], converting arbitrary text to
//! and from a percent-escaped representation. The output of [`encode`] only leaves the
//! characters `A-Z`, `a-z`, `0-9`, `-`, `.` and `_` unescaped, so it decodes correctly both as
//! an [RFC 3986](https://www.rfc-editor.org/rfc/rfc3986) URI component and as
//! `application/x-www-form-urlencoded` data.
//!
//! # Basic usage
//!
//! ```
//! use urlencoder::{decode, encode};
//!
//! assert_eq!(encode("a test &"), "a%20test%20%26");
//! assert_eq!(decode("a%20test%20%26").unwrap(), "a test &");
//! ```
//!
//! Both functions return a [`Cow`]. When nothing needs to change, the input slice itself is
//! returned and no allocation takes place.
//!
//! ```
//! use std::borrow::Cow;
//! use urlencoder::encode;
//!
//! assert!(matches!(encode("nothing-to_do.here"), Cow::Borrowed(_)));
//! ```
//!
//! Extra characters can be kept unescaped with an [`Allow`] set, and spaces can be written as
//! `+` with [`Spaces::Plus`].
//!
//! ```
//! use urlencoder::{decode_with, encode_with, Spaces};
//!
//! assert_eq!(encode_with("?test=a test", "?=", Spaces::Percent), "?test=a%20test");
//! assert_eq!(encode_with("foo bar", (), Spaces::Plus), "foo+bar");
//! assert_eq!(decode_with("foo+bar", Spaces::Plus).unwrap(), "foo bar");
//! ```

use std::borrow::Cow;

/// Malformed escape sequence.
///
/// Raised by [`decode`] when a `%` is not followed by two hexadecimal digits.
/// The offset is the byte position of the offending `%` in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedEscape {
	#[error("incomplete escape sequence at offset {offset}")]
	Incomplete { offset: usize },

	#[error("illegal characters in escape sequence at offset {offset}")]
	InvalidHex { offset: usize },
}

impl MalformedEscape {
	/// Byte offset of the `%` starting the malformed sequence.
	pub fn offset(&self) -> usize {
		match self {
			Self::Incomplete { offset } | Self::InvalidHex { offset } => *offset,
		}
	}
}

/// Result of a decoding operation.
pub type Result<T> = std::result::Result<T, MalformedEscape>;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Upper bound (exclusive) of the classification table.
const TABLE_LEN: usize = 0x7F;

/// Characters never escaped by the encoder.
///
/// `~` is left out: the form-urlencoded percent-encode set escapes it.
static UNRESERVED: [bool; TABLE_LEN] = {
	let mut table = [false; TABLE_LEN];
	let mut c = 0;
	while c < TABLE_LEN {
		table[c] = matches!(c as u8, b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'-' | b'.' | b'_');
		c += 1;
	}
	table
};

/// Checks if the given character is always left unescaped.
///
/// The unreserved set is `A-Z`, `a-z`, `0-9`, `-`, `.` and `_`. Anything else, including every
/// non-ASCII character, must be escaped.
///
/// ```
/// use urlencoder::is_unreserved;
///
/// assert!(is_unreserved('a'));
/// assert!(is_unreserved('_'));
/// assert!(!is_unreserved('~'));
/// assert!(!is_unreserved('é'));
/// ```
#[inline]
pub fn is_unreserved(c: char) -> bool {
	UNRESERVED.get(c as usize).copied().unwrap_or(false)
}

/// Representation of spaces in the encoded form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spaces {
	/// Spaces are escaped as `%20`, and `+` has no special meaning.
	#[default]
	Percent,

	/// Spaces are written as `+`, as in `application/x-www-form-urlencoded` data.
	Plus,
}

/// Extra characters allowed unescaped.
///
/// Instances of this trait are used along with [`encode_with`] to keep characters unescaped on
/// top of the [unreserved](is_unreserved) ones.
///
/// The trait is implemented for strings and character slices (any contained character is
/// allowed), single characters, and `()` or `None` (nothing extra is allowed).
///
/// ```
/// use urlencoder::{encode_with, Spaces};
///
/// assert_eq!(encode_with("?test=a test", "?=", Spaces::Percent), "?test=a%20test");
/// assert_eq!(encode_with("?test=a test", ['?', '='], Spaces::Percent), "?test=a%20test");
/// assert_eq!(encode_with("a/b", '/', Spaces::Percent), "a/b");
/// ```
///
/// Note that allowing `%` makes the output ambiguous to decode.
pub trait Allow {
	/// Decide if the given character may be left unescaped.
	fn allows(&self, c: char) -> bool;
}

impl Allow for str {
	#[inline]
	fn allows(&self, c: char) -> bool {
		self.contains(c)
	}
}

impl Allow for String {
	#[inline]
	fn allows(&self, c: char) -> bool {
		self.as_str().allows(c)
	}
}

impl Allow for [char] {
	#[inline]
	fn allows(&self, c: char) -> bool {
		self.contains(&c)
	}
}

impl<const N: usize> Allow for [char; N] {
	#[inline]
	fn allows(&self, c: char) -> bool {
		self.as_slice().allows(c)
	}
}

impl Allow for char {
	#[inline]
	fn allows(&self, c: char) -> bool {
		*self == c
	}
}

impl Allow for () {
	#[inline]
	fn allows(&self, _: char) -> bool {
		false
	}
}

impl<A: Allow> Allow for Option<A> {
	#[inline]
	fn allows(&self, c: char) -> bool {
		self.as_ref().is_some_and(|a| a.allows(c))
	}
}

impl<A: Allow + ?Sized> Allow for &A {
	#[inline]
	fn allows(&self, c: char) -> bool {
		(**self).allows(c)
	}
}

/// Encode a string.
///
/// Every character outside of the [unreserved](is_unreserved) set is replaced by the
/// percent-escaped octets of its UTF-8 representation, using uppercase hexadecimal digits.
/// Spaces become `%20`.
///
/// The input is returned borrowed when it contains only unreserved characters.
///
/// ```
/// use urlencoder::encode;
///
/// assert_eq!(encode("a test &"), "a%20test%20%26");
/// assert_eq!(encode("smile 😁"), "smile%20%F0%9F%98%81");
/// ```
#[inline]
pub fn encode(source: &str) -> Cow<'_, str> {
	encode_with(source, (), Spaces::Percent)
}

/// Encode a string, keeping the characters in `allow` unescaped.
///
/// With [`Spaces::Plus`], the space character is written as `+` unless `allow` already keeps it
/// unescaped. This does not affect how any other character is encoded.
///
/// ```
/// use urlencoder::{encode_with, Spaces};
///
/// assert_eq!(encode_with("?test=a test", "?=", Spaces::Percent), "?test=a%20test");
/// assert_eq!(encode_with("foo bar+baz", (), Spaces::Plus), "foo+bar%2Bbaz");
/// ```
pub fn encode_with<A: Allow>(source: &str, allow: A, spaces: Spaces) -> Cow<'_, str> {
	let mut encoded: Option<String> = None;

	for (i, c) in source.char_indices() {
		if is_unreserved(c) || allow.allows(c) {
			if let Some(encoded) = encoded.as_mut() {
				encoded.push(c);
			}

			continue;
		}

		let encoded = encoded.get_or_insert_with(|| {
			let mut buf = String::with_capacity(source.len() + source.len() / 2);
			buf.push_str(&source[..i]);
			buf
		});

		if c == ' ' && spaces == Spaces::Plus {
			encoded.push('+');
		} else {
			push_escaped(encoded, c);
		}
	}

	match encoded {
		Some(encoded) => Cow::Owned(encoded),
		None => Cow::Borrowed(source),
	}
}

/// Encode an optional string.
///
/// `None` is returned unchanged.
#[inline]
pub fn encode_opt(source: Option<&str>) -> Option<Cow<'_, str>> {
	source.map(encode)
}

fn push_escaped(encoded: &mut String, c: char) {
	let mut buf = [0; 4];
	for byte in c.encode_utf8(&mut buf).bytes() {
		encoded.push('%');
		encoded.push(HEX_DIGITS[(byte >> 4) as usize] as char);
		encoded.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
	}
}

#[inline(always)]
fn to_digit(b: u8) -> Option<u8> {
	match b {
		b'0'..=b'9' => Some(b - b'0'),
		b'A'..=b'F' => Some(b - b'A' + 10),
		b'a'..=b'f' => Some(b - b'a' + 10),
		_ => None,
	}
}

/// Decode a string.
///
/// Every `%XX` escape sequence is replaced by the octet it represents, and consecutive octets
/// are interpreted as UTF-8. Hexadecimal digits are accepted in both cases. Invalid UTF-8
/// sequences are replaced with U+FFFD. A `+` is kept as is.
///
/// The input is returned borrowed when it contains no `%`.
///
/// # Errors
///
/// A [`MalformedEscape`] error is returned if a `%` is not followed by two hexadecimal digits.
///
/// ```
/// use urlencoder::{decode, MalformedEscape};
///
/// assert_eq!(decode("a%20test%20%26").unwrap(), "a test &");
/// assert_eq!(decode("sdkjfh%6"), Err(MalformedEscape::Incomplete { offset: 6 }));
/// ```
#[inline]
pub fn decode(source: &str) -> Result<Cow<'_, str>> {
	decode_with(source, Spaces::Percent)
}

/// Decode a string, reading `+` as a space when `spaces` is [`Spaces::Plus`].
///
/// The input is returned borrowed when it contains neither `%` nor, with [`Spaces::Plus`], `+`.
///
/// # Errors
///
/// A [`MalformedEscape`] error is returned if a `%` is not followed by two hexadecimal digits.
///
/// ```
/// use urlencoder::{decode_with, Spaces};
///
/// assert_eq!(decode_with("foo+bar%2B", Spaces::Plus).unwrap(), "foo bar+");
/// assert_eq!(decode_with("foo+bar%2B", Spaces::Percent).unwrap(), "foo+bar+");
/// ```
pub fn decode_with(source: &str, spaces: Spaces) -> Result<Cow<'_, str>> {
	let bytes = source.as_bytes();
	let is_special = |b: u8| b == b'%' || (b == b'+' && spaces == Spaces::Plus);

	let mut decoded: Option<String> = None;
	// Octets of consecutive escape sequences, waiting to be read as UTF-8.
	let mut pending: Option<Vec<u8>> = None;

	let mut i = 0;
	while i < bytes.len() {
		match bytes[i] {
			b'%' => {
				if decoded.is_none() {
					decoded = Some(start_decoded(source, i));
				}

				let (a, b) = match (bytes.get(i + 1), bytes.get(i + 2)) {
					(Some(a), Some(b)) => (*a, *b),
					_ => return Err(MalformedEscape::Incomplete { offset: i }),
				};

				let byte = match (to_digit(a), to_digit(b)) {
					(Some(a), Some(b)) => (a << 4) | b,
					_ => return Err(MalformedEscape::InvalidHex { offset: i }),
				};

				// At most one octet per remaining triplet.
				pending
					.get_or_insert_with(|| Vec::with_capacity((bytes.len() - i) / 3))
					.push(byte);
				i += 3;
			}
			b'+' if spaces == Spaces::Plus => {
				let decoded = decoded.get_or_insert_with(|| start_decoded(source, i));
				flush_pending(decoded, pending.as_mut());
				decoded.push(' ');
				i += 1;
			}
			_ => {
				// `%` and `+` are ASCII, so the run ends on a character boundary.
				let end = bytes[i..]
					.iter()
					.position(|b| is_special(*b))
					.map_or(bytes.len(), |n| i + n);

				if let Some(decoded) = decoded.as_mut() {
					flush_pending(decoded, pending.as_mut());
					decoded.push_str(&source[i..end]);
				}

				i = end;
			}
		}
	}

	match decoded {
		Some(mut decoded) => {
			flush_pending(&mut decoded, pending.as_mut());
			Ok(Cow::Owned(decoded))
		}
		None => Ok(Cow::Borrowed(source)),
	}
}

/// Decode an optional string.
///
/// `None` is returned unchanged.
///
/// # Errors
///
/// See [`decode`].
#[inline]
pub fn decode_opt(source: Option<&str>) -> Result<Option<Cow<'_, str>>> {
	source.map(decode).transpose()
}

fn start_decoded(source: &str, i: usize) -> String {
	let mut buf = String::with_capacity(source.len());
	buf.push_str(&source[..i]);
	buf
}

fn flush_pending(decoded: &mut String, pending: Option<&mut Vec<u8>>) {
	if let Some(pending) = pending {
		for c in utf8_decode::Decoder::new(pending.drain(..)) {
			decoded.push(c.unwrap_or(char::REPLACEMENT_CHARACTER));
		}
	}
}
