//! Raw byte fuzzer for the placeholder scanner.
//!
//! Feeds arbitrary bytes (lossily decoded as UTF-8) through `parse_sql` and
//! checks the structural invariants of the result.

use honggfuzz::fuzz;
use sql_named_params::testing::test_parse_sql;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_parse_sql(data);
        });
    }
}
