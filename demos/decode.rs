extern crate urlencoder;

use urlencoder::{decode, decode_with, MalformedEscape, Spaces};

fn main() -> Result<(), MalformedEscape> {
    // Escape sequences are decoded as UTF-8,
    // in upper or lower case.
    println!("{}", decode("Hello%20World%21")?);
    // => Hello World!
    println!("{}", decode("%e2%82%ac%F0%9F%98%81")?);
    // => €😁

    // `+` is only a space when asked for.
    println!("{}", decode("a+test")?);
    // => a+test
    println!("{}", decode_with("a+test", Spaces::Plus)?);
    // => a test

    // A `%` must be followed by two hexadecimal digits.
    if let Err(e) = decode("100%") {
        println!("{}", e);
    }
    // => incomplete escape sequence at offset 3

    Ok(())
}
