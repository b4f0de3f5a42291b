//! End-to-end: parse a command line, run the fenced exercise, dump the
//! report - the same path the `lock_stress` binary takes.

use tandem::config;
use tandem::runner::exercise_lock;
use tandem_core::FullFence;

#[test]
fn parsed_config_drives_a_clean_fenced_run() {
    let args = ["--iterations", "2000", "--capacity", "32", "--limit", "8"]
        .iter()
        .map(ToString::to_string);
    let config = config::parse_args(args).unwrap();

    let report = exercise_lock::<FullFence>(&config);
    assert!(report.violation().is_none());
    assert_eq!(report.iterations, 2_000);

    let mut out = Vec::new();
    report.dump(&mut out, config.dump_limit).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("store/load fence run"));
    assert!(text.contains("shared counter = 0"));
    assert!(text.contains("mutual exclusion held"));
}
