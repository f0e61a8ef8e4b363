#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use static_carrier_cli::args::{extension_for, load_payload};
    use static_carrier_cli::bar::render;
    use static_carrier_cli::run::{run, stage_lines};
    use static_carrier_cli::{CarrierArgs, Mode};
    use static_carrier_core::telemetry::{CarrierCounters, Stage, TelemetrySnapshot, TelemetryTimer};
    use std::time::Duration;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("static-carrier-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn mode_flags_are_required_and_exclusive() {
        assert!(CarrierArgs::try_parse_from(["static-carrier", "-i", "x"]).is_err());
        assert!(CarrierArgs::try_parse_from(["static-carrier", "-e", "-d", "-i", "x"]).is_err());

        let enc = CarrierArgs::try_parse_from(["static-carrier", "-e", "-i", "x"]).unwrap();
        assert_eq!(enc.mode(), Mode::Encode);
        let dec = CarrierArgs::try_parse_from(["static-carrier", "--decode", "-i", "x"]).unwrap();
        assert_eq!(dec.mode(), Mode::Decode);
    }

    #[test]
    fn input_is_required() {
        assert!(CarrierArgs::try_parse_from(["static-carrier", "-e"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = CarrierArgs::try_parse_from([
            "static-carrier", "-e", "-i", "x", "--width", "32", "--height", "16", "--fps", "12",
            "--duration", "0.5", "--seed", "9",
        ])
        .unwrap();
        let cfg = args.carrier_config().unwrap();
        assert_eq!((cfg.width, cfg.height), (32, 16));
        assert_eq!(cfg.fps, 12.0);
        assert_eq!(cfg.min_duration_secs, 0.5);
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = scratch_dir("cfg");
        let path = dir.join("carrier.json");
        std::fs::write(&path, r#"{ "width": 100, "height": 50, "fps": 24.0 }"#).unwrap();

        let args = CarrierArgs::try_parse_from([
            "static-carrier", "-e", "-i", "x", "--config", path.to_str().unwrap(), "--width", "20",
        ])
        .unwrap();
        let cfg = args.carrier_config().unwrap();
        assert_eq!(cfg.width, 20);
        assert_eq!(cfg.height, 50);
        assert_eq!(cfg.fps, 24.0);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let args = CarrierArgs::try_parse_from(["static-carrier", "-e", "-i", "x", "--width", "0"]).unwrap();
        assert!(args.carrier_config().is_err());
        let args = CarrierArgs::try_parse_from(["static-carrier", "-e", "-i", "x", "--fps", "0"]).unwrap();
        assert!(args.carrier_config().is_err());
    }

    #[test]
    fn extension_comes_from_the_last_suffix() {
        assert_eq!(extension_for(Path::new("photo.png")), ".png");
        assert_eq!(extension_for(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_for(Path::new("Makefile")), ".bin");
        assert_eq!(extension_for(Path::new("dir/notes.md")), ".md");
    }

    #[test]
    fn text_mode_uses_input_as_payload() {
        let args = CarrierArgs::try_parse_from(["static-carrier", "-e", "-t", "-i", "hello"]).unwrap();
        let (payload, ext) = load_payload(&args).unwrap();
        assert_eq!(payload, b"hello");
        assert_eq!(ext, ".txt");
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let args =
            CarrierArgs::try_parse_from(["static-carrier", "-e", "-i", "/definitely/not/here.png"]).unwrap();
        assert!(load_payload(&args).is_err());
    }

    #[test]
    fn bar_renders_known_total() {
        let line = render("Encoding", 5, Some(10));
        assert!(line.starts_with("Encoding: |"));
        assert!(line.ends_with("| 50% (5/10 frames)"));
        assert_eq!(line.matches('█').count(), 20);
        assert_eq!(line.matches('-').count(), 20);
    }

    #[test]
    fn bar_renders_complete_and_unknown_total() {
        let done = render("Decoding", 10, Some(10));
        assert!(done.contains("100% (10/10 frames)"));
        assert_eq!(done.matches('█').count(), 40);

        assert_eq!(render("Decoding", 7, None), "Decoding: 7 frames");
    }

    #[test]
    fn stage_lines_are_sorted_and_in_ms() {
        let mut timer = TelemetryTimer::new();
        timer.add_stage_time(Stage::Write, Duration::from_millis(3));
        timer.add_stage_time(Stage::Generate, Duration::from_micros(1500));
        timer.finish();
        let snap = TelemetrySnapshot::from(&CarrierCounters::default(), &timer);

        let lines = stage_lines(&snap);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("generate"));
        assert!(lines[0].ends_with("1.500 ms"));
        assert!(lines[1].starts_with("write"));
        assert!(lines[1].ends_with("3.000 ms"));
    }

    #[test]
    fn file_round_trip_through_y4m() {
        let dir = scratch_dir("roundtrip");
        let input = dir.join("data.bin");
        let video = dir.join("carrier.y4m");
        let restored = dir.join("restored.bin");
        let stats = dir.join("stats.json");
        let payload: Vec<u8> = (0..=255u8).cycle().take(700).collect();
        std::fs::write(&input, &payload).unwrap();

        let enc = CarrierArgs::try_parse_from([
            "static-carrier", "-e", "-q",
            "-i", input.to_str().unwrap(),
            "-o", video.to_str().unwrap(),
            "--width", "64", "--height", "32", "--fps", "5", "--duration", "1", "--seed", "3",
        ])
        .unwrap();
        run(&enc).unwrap();

        let dec = CarrierArgs::try_parse_from([
            "static-carrier", "-d", "-q",
            "-i", video.to_str().unwrap(),
            "-o", restored.to_str().unwrap(),
            "--stats", stats.to_str().unwrap(),
        ])
        .unwrap();
        run(&dec).unwrap();

        assert_eq!(std::fs::read(&restored).unwrap(), payload);
        let json = std::fs::read_to_string(&stats).unwrap();
        assert!(json.contains("\"bytes_payload\": 700"));
    }

    #[test]
    fn decode_of_missing_video_fails_without_output() {
        let dir = scratch_dir("missing");
        let out = dir.join("never.bin");
        let args = CarrierArgs::try_parse_from([
            "static-carrier", "-d", "-q",
            "-i", dir.join("absent.y4m").to_str().unwrap(),
            "-o", out.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(&args).is_err());
        assert!(!out.exists());
    }
}
