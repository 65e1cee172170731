//! End-to-end session through the global konsole.
//!
//! The `log` backend can be installed once per process, so the whole session
//! runs as a single test.

use konsole::testing::CaptureStream;
use konsole::{Config, Detail, Severity};

const ESC: &str = "\x1b";

fn sgr(on: &str, text: &str, off: &str) -> String {
    format!("{ESC}[{on}m{text}{ESC}[{off}m")
}

#[test]
fn test_scripted_session() {
    let konsole = konsole::init();
    assert!(konsole.is_installed());
    assert!(std::ptr::eq(konsole, konsole::konsole()));
    // The environment may carry a level; the session starts from INFO.
    konsole::config(&Config::new().with_level(Severity::Info));
    assert_eq!(log::max_level(), log::LevelFilter::Info);

    let local_logger = konsole::logger_named(file!());
    let capture = CaptureStream::new();
    {
        let _guard = konsole::redirect(capture.clone());

        konsole::config(&Config::new().with_color(true));
        konsole::info!("fyi");
        konsole::error!(detail = "broken!"; "bad!");

        konsole::config(&Config::new().with_color(false));
        konsole::critical!("big {}!", "bad");
        konsole::debug!("yo!");

        konsole::config(&Config::new().with_level(Severity::Debug));
        local_logger.log_detail(Severity::Warning, format_args!("beware!"), 665);
        konsole::info!(detail = "one\ntwo"; "look");
        konsole::debug!(detail = Detail::Mapping(Vec::new()); "detail");
    }

    let expected = [
        sgr("1", "[INFO]", "0"),
        " ".to_string(),
        sgr("1", "fyi.", "0"),
        "\n".to_string(),
        sgr("1;31", "[ERROR]", "0;39"),
        " ".to_string(),
        sgr("1", "bad!", "0"),
        sgr("90", "\n    broken!", "0"),
        "\n".to_string(),
        "[CRITICAL] big bad!\n".to_string(),
        "[WARNING] beware!\n".to_string(),
        "    665\n".to_string(),
        "[INFO] look:\n".to_string(),
        "    one\n".to_string(),
        "    two\n".to_string(),
        "[DEBUG] detail.\n".to_string(),
    ]
    .concat();
    assert_eq!(capture.raw_string(), expected);
    assert!(capture.contains_all(&["[INFO] fyi.", "[ERROR] bad!", "    broken!"]));
    capture.assert_not_contains("yo!");

    // Plain `log` macros share the backend and its reserved keys.
    let capture = CaptureStream::new();
    konsole.redirect_with(capture.clone(), || {
        log::warn!(detail = 665; "beware!");
        log::error!(severity = "critical"; "big {}!", "bad");
        log::trace!("deep");
    });
    assert_eq!(
        capture.output(),
        vec!["[WARNING] beware!", "    665", "[CRITICAL] big bad!", "[DEBUG] deep."]
    );
    assert!(capture.matches(r"(?m)^\[CRITICAL\] big bad!$"));
    capture.assert_not_contains("trace");

    // Levels and volumes. Current level is DEBUG.
    konsole::config(&Config::new().with_level(Severity::Error));
    assert_eq!(konsole.threshold(), Severity::Error);
    assert_eq!(log::max_level(), log::LevelFilter::Error);

    konsole::config(&Config::new().with_level(Severity::Error).with_volume(2));
    assert_eq!(konsole.threshold(), Severity::Debug);
    assert_eq!(log::max_level(), log::LevelFilter::Trace);

    konsole::config(&Config::new().with_volume(-665));
    assert_eq!(konsole.threshold(), Severity::Critical);
    assert_eq!(log::max_level(), log::LevelFilter::Error);

    konsole::config(&Config::new().with_volume(665));
    assert_eq!(konsole.threshold(), Severity::Debug);

    // Installing again is a no-op.
    assert!(konsole::try_init().is_ok());
    assert!(log::set_logger(konsole).is_err());
}
