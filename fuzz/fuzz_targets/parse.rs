#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    match celparse::parse(source) {
        Ok(expr) => {
            // Anything that parses must survive an unparse round trip
            let text = celparse::unparse(&expr);
            assert!(celparse::parse(&text).is_ok(), "unparse output does not parse: {text}");
        }
        Err(diags) => {
            for err in diags.iter() {
                assert!(err.span().end <= source.len());
            }
        }
    }
});
