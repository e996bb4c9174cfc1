extern crate urlencoder;

use std::borrow::Cow;

use urlencoder::{encode, encode_with, Spaces};

fn main() {
    // Characters outside of `A-Z a-z 0-9 - . _` are escaped
    // as the UTF-8 octets of the character.
    println!("{}", encode("Hello World!"));
    // => Hello%20World%21

    // Nothing is allocated when there is nothing to escape.
    if let Cow::Borrowed(s) = encode("Hello_World") {
        println!("borrowed: {}", s);
    }
    // => borrowed: Hello_World

    // You can keep more characters unescaped with an `Allow` set,
    // here a string listing them.
    println!("{}", encode_with("?q=a test", "?=", Spaces::Percent));
    // => ?q=a%20test

    // Form data usually writes spaces as `+`.
    println!("{}", encode_with("a test 😁", (), Spaces::Plus));
    // => a+test+%F0%9F%98%81
}
