#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use static_carrier_core::config::CarrierConfig;
    use static_carrier_core::frames::{FrameDecoder, FrameEncoder, FrameError, FrameGeometry, GrayFrame};
    use static_carrier_core::io::y4m::{fps_to_ratio, Colorspace, Y4mHeader, MAX_FRAME_BYTES};
    use static_carrier_core::io::{FrameSink, FrameSource, InputSource, OutputSink, VideoError, Y4mReader, Y4mWriter};
    use static_carrier_core::progress::{FnProgress, NoProgress};

    fn geom(w: u32, h: u32) -> FrameGeometry {
        FrameGeometry::new(w, h).unwrap()
    }

    fn reader(bytes: Vec<u8>) -> Result<Y4mReader<Cursor<Vec<u8>>>, VideoError> {
        Y4mReader::new(Cursor::new(bytes))
    }

    fn stream(header: &str, frames: &[&[u8]]) -> Vec<u8> {
        let mut out = header.as_bytes().to_vec();
        for f in frames {
            out.extend_from_slice(b"FRAME\n");
            out.extend_from_slice(f);
        }
        out
    }

    // ## Header

    #[test]
    fn header_line_format() {
        let h = Y4mHeader { geometry: geom(64, 48), fps_num: 30, fps_den: 1, colorspace: Colorspace::Mono };
        assert_eq!(h.encode(), "YUV4MPEG2 W64 H48 F30:1 Ip A1:1 Cmono\n");
        assert_eq!(Y4mHeader::parse(h.encode().as_bytes()).unwrap(), h);
    }

    #[test]
    fn frame_rate_ratios() {
        assert_eq!(fps_to_ratio(30.0).unwrap(), (30, 1));
        assert_eq!(fps_to_ratio(29.97).unwrap(), (2997, 100));
        assert_eq!(fps_to_ratio(0.5).unwrap(), (1, 2));
        assert!(matches!(fps_to_ratio(0.0), Err(VideoError::InvalidFrameRate(_))));
        assert!(fps_to_ratio(f64::NAN).is_err());
        assert!(fps_to_ratio(-1.0).is_err());
    }

    #[test]
    fn colourspace_defaults_to_420() {
        let h = Y4mHeader::parse(b"YUV4MPEG2 W4 H2 F25:1\n").unwrap();
        assert_eq!(h.colorspace, Colorspace::C420);
        assert_eq!(h.fps(), 25.0);
    }

    #[test]
    fn chroma_sizes() {
        assert_eq!(Colorspace::Mono.chroma_bytes(geom(4, 2)), 0);
        assert_eq!(Colorspace::C420.chroma_bytes(geom(4, 2)), 4);
        assert_eq!(Colorspace::C420.chroma_bytes(geom(3, 3)), 8);
        assert_eq!(Colorspace::C422.chroma_bytes(geom(4, 2)), 8);
        assert_eq!(Colorspace::C444.chroma_bytes(geom(4, 2)), 16);
    }

    #[test]
    fn bad_headers() {
        assert!(matches!(reader(Vec::new()), Err(VideoError::BadSignature)));
        assert!(matches!(reader(b"MPEG2 W4 H2 F1:1\n".to_vec()), Err(VideoError::BadSignature)));
        assert!(matches!(reader(b"YUV4MPEG2 H2 F1:1\n".to_vec()), Err(VideoError::MissingParameter('W'))));
        assert!(matches!(reader(b"YUV4MPEG2 W4 H2\n".to_vec()), Err(VideoError::MissingParameter('F'))));
        assert!(matches!(reader(b"YUV4MPEG2 W-4 H2 F1:1\n".to_vec()), Err(VideoError::InvalidParameter(_))));
        assert!(matches!(reader(b"YUV4MPEG2 W4 H2 F0:1\n".to_vec()), Err(VideoError::InvalidParameter(_))));
        assert!(matches!(
            reader(b"YUV4MPEG2 W4 H2 F1:1 C420p10\n".to_vec()),
            Err(VideoError::UnsupportedColorspace(_))
        ));
        assert!(matches!(
            reader(b"YUV4MPEG2 W0 H2 F1:1\n".to_vec()),
            Err(VideoError::Frame(FrameError::InvalidGeometry { width: 0, height: 2 }))
        ));
    }

    #[test]
    fn oversized_frames_are_rejected_before_allocation() {
        let huge = b"YUV4MPEG2 W2147483647 H2147483647 F30:1 Cmono\nFRAME\n".to_vec();
        assert!(matches!(reader(huge), Err(VideoError::InvalidParameter(_))));

        // luma alone fits, chroma pushes it over
        let h = Y4mHeader::parse(b"YUV4MPEG2 W16384 H16384 F1:1 Cmono\n").unwrap();
        assert!(h.frame_bytes() <= MAX_FRAME_BYTES);
        assert!(matches!(
            Y4mHeader::parse(b"YUV4MPEG2 W16384 H16384 F1:1 C444\n"),
            Err(VideoError::InvalidParameter(_))
        ));
    }

    // ## Reader

    #[test]
    fn chroma_planes_are_skipped() {
        let luma_a = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let luma_b = [9u8; 8];
        let chroma = [128u8; 4];
        let a: Vec<u8> = luma_a.iter().chain(&chroma).copied().collect();
        let b: Vec<u8> = luma_b.iter().chain(&chroma).copied().collect();
        let bytes = stream("YUV4MPEG2 W4 H2 F25:1 Ip C420jpeg\n", &[&a, &b]);

        let mut r = reader(bytes).unwrap();
        assert_eq!(r.read_frame().unwrap().unwrap().pixels(), &luma_a);
        assert_eq!(r.read_frame().unwrap().unwrap().pixels(), &luma_b);
        assert!(r.read_frame().unwrap().is_none());
        assert_eq!(r.frames_read(), 2);
    }

    #[test]
    fn frame_parameters_are_tolerated() {
        let mut bytes = b"YUV4MPEG2 W2 H1 F1:1 Cmono\n".to_vec();
        bytes.extend_from_slice(b"FRAME Ixyz\n\x00\xff");
        let mut r = reader(bytes).unwrap();
        assert_eq!(r.read_frame().unwrap().unwrap().pixels(), &[0, 255]);
    }

    #[test]
    fn truncated_luma() {
        let bytes = stream("YUV4MPEG2 W4 H2 F1:1 Cmono\n", &[&[0u8; 4]]);
        let mut r = reader(bytes).unwrap();
        assert!(matches!(r.read_frame(), Err(VideoError::TruncatedFrame { index: 0 })));
    }

    #[test]
    fn truncated_chroma() {
        let bytes = stream("YUV4MPEG2 W4 H2 F1:1 C444\n", &[&[0u8; 8 + 10]]);
        let mut r = reader(bytes).unwrap();
        assert!(matches!(r.read_frame(), Err(VideoError::TruncatedFrame { index: 0 })));
    }

    #[test]
    fn bad_frame_marker() {
        let mut bytes = b"YUV4MPEG2 W2 H1 F1:1 Cmono\n".to_vec();
        bytes.extend_from_slice(b"FRAMX\n\x00\x00");
        let mut r = reader(bytes).unwrap();
        assert!(matches!(r.read_frame(), Err(VideoError::BadFrameMarker { index: 0 })));
    }

    #[test]
    fn frames_iterator_stops_after_error() {
        let mut bytes = stream("YUV4MPEG2 W2 H1 F1:1 Cmono\n", &[&[1, 2]]);
        bytes.extend_from_slice(b"junk\n");
        let mut r = reader(bytes).unwrap();
        let got: Vec<_> = r.frames().collect();
        assert_eq!(got.len(), 2);
        assert!(got[0].is_ok());
        assert!(got[1].is_err());
    }

    // ## Writer

    #[test]
    fn writer_reader_round_trip() {
        let g = geom(3, 2);
        let frames = vec![
            GrayFrame::from_raw(3, 2, vec![0, 255, 0, 255, 0, 255]).unwrap(),
            GrayFrame::filled(g, 255),
        ];

        let mut w = Y4mWriter::new(Vec::new(), g, 12.0).unwrap();
        for f in &frames {
            w.write_frame(f).unwrap();
        }
        w.finish().unwrap();
        assert_eq!(w.frames_written(), 2);
        let bytes = w.into_inner();
        assert!(bytes.starts_with(b"YUV4MPEG2 W3 H2 F12:1 Ip A1:1 Cmono\nFRAME\n"));

        let mut r = reader(bytes).unwrap();
        assert_eq!(r.geometry(), g);
        assert_eq!(r.header().fps(), 12.0);
        let back: Vec<GrayFrame> = r.frames().map(Result::unwrap).collect();
        assert_eq!(back, frames);
    }

    #[test]
    fn empty_video_still_has_header() {
        let mut w = Y4mWriter::new(Vec::new(), geom(2, 2), 1.0).unwrap();
        w.finish().unwrap();
        let mut r = reader(w.into_inner()).unwrap();
        assert!(r.read_frame().unwrap().is_none());
    }

    #[test]
    fn writer_rejects_wrong_shape() {
        let mut w = Y4mWriter::new(Vec::new(), geom(2, 2), 1.0).unwrap();
        let err = w.write_frame(&GrayFrame::filled(geom(4, 1), 0)).unwrap_err();
        assert!(matches!(err, VideoError::Frame(FrameError::Shape { index: 0, .. })));
        assert!(w.into_inner().is_empty());
    }

    // ## Codec over Y4M

    #[test]
    fn payload_survives_y4m_file() {
        let path = std::env::temp_dir().join(format!("static-carrier-y4m-{}.y4m", std::process::id()));
        let payload: Vec<u8> = (0..300u32).map(|i| (i * 7 % 256) as u8).collect();
        let cfg = CarrierConfig::new(40, 30, 8.0, 1.0).with_seed(11);

        let enc = FrameEncoder::from_config(&cfg).unwrap();
        let total = enc.frame_count_for(payload.len());
        let mut sink = Y4mWriter::create(OutputSink::File(path.clone()), enc.geometry(), enc.fps()).unwrap();
        let snap = enc.encode_to_sink(&payload, ".png", &mut sink, NoProgress).unwrap();
        assert_eq!(snap.total_frames(), total);
        drop(sink);

        let mut src = Y4mReader::open(InputSource::File(path.clone())).unwrap();
        let mut seen: Vec<(u64, Option<u64>)> = Vec::new();
        let mut dec = FrameDecoder::new(src.geometry());
        let recovered = dec
            .decode_source(&mut src, FnProgress(|done: u64, total: Option<u64>| seen.push((done, total))))
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(recovered.extension, ".png");
        assert_eq!(recovered.payload, payload);
        assert_eq!(seen.len() as u64, total);
        assert_eq!(seen.first(), Some(&(1, Some(total))));
        assert_eq!(seen.last(), Some(&(total, Some(total))));
    }

    #[test]
    fn in_memory_input_source() {
        let g = geom(2, 1);
        let mut w = Y4mWriter::new(Vec::new(), g, 1.0).unwrap();
        w.write_frame(&GrayFrame::filled(g, 7)).unwrap();
        w.finish().unwrap();

        let mut r = Y4mReader::open(InputSource::Memory(w.into_inner())).unwrap();
        assert_eq!(r.read_frame().unwrap().unwrap().pixels(), &[7, 7]);
    }

    #[test]
    fn remaining_frames_follow_stream_length() {
        let g = geom(4, 2);
        let mut w = Y4mWriter::new(Vec::new(), g, 1.0).unwrap();
        for _ in 0..3 {
            w.write_frame(&GrayFrame::filled(g, 0)).unwrap();
        }
        w.finish().unwrap();
        let bytes = w.into_inner();

        // plain readers cannot know
        assert_eq!(reader(bytes.clone()).unwrap().remaining_hint(), None);

        let mut r = Y4mReader::open(InputSource::Memory(bytes)).unwrap();
        assert_eq!(r.remaining_hint(), Some(3));
        r.read_frame().unwrap();
        assert_eq!(r.remaining_hint(), Some(2));
        while r.read_frame().unwrap().is_some() {}
        assert_eq!(r.remaining_hint(), Some(0));
    }

    #[test]
    fn remaining_frames_count_chroma() {
        let a = [0u8; 8 + 4];
        let bytes = stream("YUV4MPEG2 W4 H2 F25:1 C420jpeg\n", &[&a, &a]);
        let r = Y4mReader::new(Cursor::new(bytes.clone())).unwrap().with_stream_len(bytes.len() as u64);
        assert_eq!(r.remaining_hint(), Some(2));
    }
}
