use interlink_panel::{
    display::{FrameBuffer, RX_BOX, TX_BOX},
    logtail::{read_tail, TailError},
    metrics::HostMetrics,
    screen::{compose, ScreenKind},
    status::{RadioState, StatusSnapshot, CAPTURE_ERROR, IDLE_SPEAKER, UNKNOWN_CONFERENCE},
};
use std::io::Write;

fn svxlink_log(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp log");
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn snapshot_of(file: &tempfile::NamedTempFile, window: usize) -> StatusSnapshot {
    StatusSnapshot::from_tail(&read_tail(file.path(), window))
}

#[test]
fn realistic_session_window() {
    let log = svxlink_log(&[
        "Sat Oct 18 21:14:02 2025: EchoLink directory status changed to ON",
        "Sat Oct 18 21:14:10 2025: EchoLink chat message received from *BRASIL* --- Welcome to the conference",
        "Sat Oct 18 21:14:11 2025: *BRASIL* -> PY2XYZ Joao",
        "Sat Oct 18 21:14:12 2025: Tx1: Turning the transmitter ON",
        "Sat Oct 18 21:14:20 2025: Tx1: Turning the transmitter OFF",
        "Sat Oct 18 21:14:25 2025: Tx1: Turning the transmitter ON",
    ]);
    let snapshot = snapshot_of(&log, 20);
    assert_eq!(snapshot.conference, "*BRASIL*");
    assert_eq!(snapshot.speaker, "PY2XYZ Joao");
    assert_eq!(snapshot.radio, RadioState::Transmitting);
}

#[test]
fn events_older_than_window_are_forgotten() {
    let mut lines = vec!["EchoLink chat message received from NodeA --- hi", "NodeA -> Bob"];
    let filler: Vec<String> = (0..20).map(|n| format!("SimplexLogic: idle tick {n}")).collect();
    lines.extend(filler.iter().map(String::as_str));
    let log = svxlink_log(&lines);

    assert_eq!(snapshot_of(&log, 20), StatusSnapshot::default());
    let wide = snapshot_of(&log, 22);
    assert_eq!(wide.conference, "NodeA");
    assert_eq!(wide.speaker, "Bob");
}

#[test]
fn each_pass_starts_from_defaults() {
    let busy = svxlink_log(&[
        "EchoLink chat message received from NodeA --- hi",
        "Turning the transmitter ON",
    ]);
    let quiet = svxlink_log(&["nothing to see"]);

    let first = snapshot_of(&busy, 20);
    assert_eq!(first.radio, RadioState::Transmitting);
    let second = snapshot_of(&quiet, 20);
    assert_eq!(second, StatusSnapshot::default());
    assert_eq!(snapshot_of(&busy, 20), first);
}

#[test]
fn malformed_conference_line_is_field_local() {
    let log = svxlink_log(&[
        "EchoLink chat message received from NodeZ without delimiter",
        "Turning the transmitter ON",
    ]);
    let snapshot = snapshot_of(&log, 20);
    assert_eq!(snapshot.conference, CAPTURE_ERROR);
    assert_eq!(snapshot.speaker, IDLE_SPEAKER);
    assert_eq!(snapshot.radio, RadioState::Transmitting);
}

#[test]
fn missing_log_is_quietly_default() {
    let dir = tempfile::tempdir().unwrap();
    let tail = read_tail(&dir.path().join("svxlink"), 20);
    assert!(matches!(tail, Err(TailError::NotFound(_))));
    let snapshot = StatusSnapshot::from_tail(&tail);
    assert_eq!(snapshot.conference, UNKNOWN_CONFERENCE);
    assert_eq!(snapshot.speaker, IDLE_SPEAKER);
    assert_eq!(snapshot.radio, RadioState::ReceivingFree);
}

#[test]
fn exactly_one_block_lit_on_every_screen() {
    let metrics = HostMetrics {
        ip_address: "192.168.15.2".into(),
        cpu_percent: 23.0,
        temperature: "51.2°C".into(),
    };
    let snapshots = [
        StatusSnapshot::default(),
        StatusSnapshot {
            radio: RadioState::Transmitting,
            ..StatusSnapshot::default()
        },
        StatusSnapshot::read_failure("permission denied"),
    ];
    for snapshot in &snapshots {
        for kind in [ScreenKind::Status, ScreenKind::Metrics] {
            let screen = compose(kind, "INTERLINK", &metrics, snapshot);
            assert!(screen.indicators.tx().highlighted ^ screen.indicators.rx().highlighted);

            let mut frame = FrameBuffer::new();
            frame.paint(&screen);
            assert!(frame.is_filled(TX_BOX) ^ frame.is_filled(RX_BOX));
            assert_eq!(frame.is_filled(TX_BOX), snapshot.radio.is_transmitting());
        }
    }
}
