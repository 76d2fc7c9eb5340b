//! Structured fuzzer mixing placeholders with every quoting and comment form.
//!
//! Random bytes rarely produce a closed dollar quote or an Oracle `q'<...>'`
//! literal, so this target assembles queries from fragments instead.

use honggfuzz::fuzz;
use sql_named_params::testing::FuzzQuery;

fn main() {
    loop {
        fuzz!(|query: FuzzQuery| {
            query.check();
        });
    }
}
