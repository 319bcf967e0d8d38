//! Fuzz target for rule and sales loading.
//!
//! Arbitrary cell values under valid headers must load or fail with an
//! error, never panic.

#![no_main]

use cartwise::{Cartwise, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let rules = format!(
        "antecedent\tconsequent\tMonth\ttype\tsupport\tconfidence\tlift\n{}",
        content
    );
    let sales = format!("Description\tQuantity\tUnitPrice\n{}", content);

    let parser = Parser::new();
    let (Ok(rules), Ok(sales)) = (parser.parse_str(&rules), parser.parse_str(&sales)) else {
        return;
    };
    let _ = Cartwise::new().load_tables(&rules, &sales);
});
