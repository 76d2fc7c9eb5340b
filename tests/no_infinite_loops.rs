//! Inputs that once made scanners of this kind spin forever.
//!
//! Each input runs on a worker thread and must finish within
//! [`TIME_LIMIT`]; the interesting part is the `q`/`Q` handling, where a
//! rejected Oracle quote must still move past the `q`.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sql_named_params::{Dialect, ParseError, ParsedSql};

/// Generous enough for debug builds, far below what a hang would take.
const TIME_LIMIT: Duration = Duration::from_secs(2);

#[track_caller]
fn parse_within_limit(sql: String) -> Result<ParsedSql, ParseError> {
    let (done, finished) = mpsc::channel();
    let shown: String = sql.chars().take(80).collect();
    thread::spawn(move || {
        let _ = done.send(Dialect::MySql.parse_sql(&sql));
    });
    finished
        .recv_timeout(TIME_LIMIT)
        .unwrap_or_else(|_| panic!("parser hung on {shown:?}"))
}

#[test]
fn test_q_patterns_terminate() {
    for sql in [
        "SELECT id FROM logs WHERE file_path LIKE :path || '%'",
        "SELECT IFNULL(email, '') FROM users WHERE id = :id",
        "SELECT seq FROM sequences WHERE id = :id",
        "SELECT * FROM queue WHERE status = :status",
        "SELECT question, quantity FROM quiz WHERE quality > :threshold",
        "SELECT * FROM freq",
        "SELECT * FROM users WHERE name = q'<text",
        "SELECT * FROM users WHERE name = q<text>",
        "SELECT * FROM users WHERE name = '>>>' AND id = :id",
        "SELECT * FROM tasks WHERE LOWER(title) LIKE LOWER('%' || :q || '%')",
        "SELECT t.id, IFNULL(u.email,'') AS email FROM tasks t LEFT JOIN users u ON u.id = t.assignee_id WHERE (LOWER(t.title) LIKE LOWER('%' || :q || '%'))",
        "q",
        "Q",
        "qqq",
        "QQQ",
        "q'",
        "q'<",
        "q'<>",
        "q'<>'",
        "q   ",
        "q \t\n",
        "q  '",
    ] {
        parse_within_limit(sql.into()).unwrap();
    }
}

#[test]
fn test_truncated_openers_terminate() {
    for sql in [
        "'", "\"", "`", "[", "$", "$$", "$a", "$a$", "-", "--", "#", "/", "/*", "/*/", ":", "::",
        ":a.", ":a[", ":a[1", "'':", "$$'", "q'q'",
    ] {
        let _ = parse_within_limit(sql.into());
    }
}

#[test]
fn test_pathological_repetitions_terminate() {
    let inputs = [
        "q".repeat(100_000),
        "$".repeat(100_000),
        "$a".repeat(50_000),
        ":".repeat(100_000),
        ":a".repeat(50_000),
        "'".repeat(100_000),
        "/*".repeat(50_000),
        "q'".repeat(50_000),
        format!("$tag${}", "$ta".repeat(30_000)),
        format!("q'<{}", ">".repeat(100_000)),
    ];
    for sql in inputs {
        let _ = parse_within_limit(sql);
    }
}

#[test]
fn test_many_distinct_placeholders() {
    let sql: Vec<String> = (0..10_000).map(|i| format!(":p{i}")).collect();
    let parsed = parse_within_limit(sql.join(",")).unwrap();
    assert_eq!(parsed.parameters().len(), 10_000);
    assert_eq!(parsed.parameters()[9_999].index, 10_000);
}

#[test]
fn test_random_sql_alphabet_terminates() {
    const ALPHABET: &[u8] = b"qQ:'\"`[]$#-/*._ a0\n<>{}()";
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..500 {
        let len = rng.random_range(0..200);
        let sql: String = (0..len)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect();
        let _ = parse_within_limit(sql);
    }
}
