#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsontok::{END, ParserOptions, Scanner, parse_reader, parse_str, parse_str_with};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"\r\n", b"\x0b", b"\x0c"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        prefix += append_value(&mut data[prefix..], size, max_size - prefix);
        prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let mut written = 0;
        for _ in 0..rng.random_range(1..=limit.min(4)) {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let mut rendered = String::new();
    with_rng(|rng| render_lenient(&value.0, rng, &mut rendered));

    let len = rendered.len().min(limit);
    data[..len].copy_from_slice(&rendered.as_bytes()[..len]);
    len
}

/// Writes `value` as JSON, randomly dropping quotes around simple keys,
/// switching to single quotes, and adding trailing separators.
fn render_lenient(value: &Value, rng: &mut SmallRng, out: &mut String) {
    match value {
        Value::Object(members) => {
            out.push('{');
            for (i, (k, v)) in members.iter().enumerate() {
                if i > 0 {
                    out.push(if rng.random_bool(0.1) { ';' } else { ',' });
                }
                let bare = !k.is_empty() && k.chars().all(|c| c.is_ascii_alphanumeric());
                if bare && rng.random_bool(0.5) {
                    out.push_str(k);
                } else {
                    render_string(k, rng, out);
                }
                out.push(':');
                render_lenient(v, rng, out);
            }
            if !members.is_empty() && rng.random_bool(0.2) {
                out.push(',');
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_lenient(v, rng, out);
            }
            if !items.is_empty() && rng.random_bool(0.2) {
                out.push(',');
            }
            out.push(']');
        }
        Value::String(s) => render_string(s, rng, out),
        other => out.push_str(&other.to_string()),
    }
}

fn render_string(s: &str, rng: &mut SmallRng, out: &mut String) {
    let encoded = Value::String(s.to_owned()).to_string();
    if rng.random_bool(0.3) && !s.contains(['\'', '"']) {
        out.push('\'');
        out.push_str(&encoded[1..encoded.len() - 1]);
        out.push('\'');
    } else {
        out.push_str(&encoded);
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

fn scan(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let seed = u32::from_le_bytes(data[1..5].try_into().unwrap());
    let data = &data[HEADER..];
    let text = String::from_utf8_lossy(data).into_owned();

    // Reading bytes and reading the lossily decoded text must agree.
    let from_text = parse_str(&text);
    let from_reader = parse_reader(data);
    match (&from_text, &from_reader) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
        _ => panic!("text and reader disagree: {from_text:?} vs {from_reader:?}"),
    }

    let options = ParserOptions {
        max_depth: usize::from(flags & 0x1F),
        ignore_null_value: flags & 0x20 != 0,
        reject_duplicate_keys: flags & 0x40 != 0,
    };
    let _ = parse_str_with(&text, options);

    // A missed skip leaves the scanner exactly where it was.
    let wanted = char::from(b' ' + (seed % 95) as u8);
    let mut scanner = Scanner::from_reader(data, options);
    for _ in 0..(seed >> 8) % 32 {
        if scanner.next().unwrap() == END {
            break;
        }
    }
    let before = scanner.position();
    let previous = scanner.previous();
    match scanner.skip_to(wanted).unwrap() {
        END => {
            assert_eq!(scanner.position(), before);
            assert_eq!(scanner.previous(), previous);
        }
        found => {
            assert_eq!(found, wanted);
            assert_eq!(scanner.next().unwrap(), wanted);
        }
    }
}

fuzz_target!(|data: &[u8]| scan(data));
