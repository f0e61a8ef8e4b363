//! io/y4m.rs
//!
//! YUV4MPEG2 stream reader and writer.
//!
//! Layout:
//!
//! ```text
//! YUV4MPEG2 W<w> H<h> F<num>:<den> Ip A1:1 C<colourspace>\n
//! FRAME\n <luma: w*h bytes> [chroma planes]
//! FRAME\n ...
//! ```
//!
//! The writer always emits `Cmono`. The reader also accepts 8-bit 4:2:0,
//! 4:2:2 and 4:4:4 streams and drops their chroma planes, so a video that
//! went through a colour pipeline can still be thresholded.

use std::io::{self, BufRead, Read, Write};

use crate::frames::{FrameError, FrameGeometry, GrayFrame};
use crate::io::{open_input, open_output, FrameSink, FrameSource, InputSource, OutputSink, VideoError};

pub const Y4M_SIGNATURE: &str = "YUV4MPEG2";
pub const FRAME_MARKER: &[u8] = b"FRAME";

/// Upper bound for a stream or frame header line.
const MAX_HEADER_LINE: u64 = 4096;

/// Largest frame (luma + chroma) a stream header may declare. Frame
/// buffers are sized from untrusted `W`/`H` values, so anything above
/// this is rejected before allocation. 8K 4:4:4 is about 100 MiB.
pub const MAX_FRAME_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colorspace {
    Mono,
    C420,
    C422,
    C444,
}

impl Colorspace {
    pub fn parse(tag: &str) -> Result<Self, VideoError> {
        match tag {
            "mono" => Ok(Colorspace::Mono),
            "420" | "420jpeg" | "420paldv" | "420mpeg2" => Ok(Colorspace::C420),
            "422" => Ok(Colorspace::C422),
            "444" => Ok(Colorspace::C444),
            other => Err(VideoError::UnsupportedColorspace(other.to_owned())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Colorspace::Mono => "mono",
            Colorspace::C420 => "420jpeg",
            Colorspace::C422 => "422",
            Colorspace::C444 => "444",
        }
    }

    /// Bytes of Cb + Cr following the luma plane of each frame.
    /// Saturates for dimensions no stream header is allowed to declare.
    pub fn chroma_bytes(&self, g: FrameGeometry) -> u64 {
        let (w, h) = (g.width() as u64, g.height() as u64);
        let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
        let plane = match self {
            Colorspace::Mono => 0,
            Colorspace::C420 => cw * ch,
            Colorspace::C422 => cw * h,
            Colorspace::C444 => w * h,
        };
        plane.saturating_mul(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Y4mHeader {
    pub geometry: FrameGeometry,
    pub fps_num: u32,
    pub fps_den: u32,
    pub colorspace: Colorspace,
}

impl Y4mHeader {
    pub fn fps(&self) -> f64 {
        self.fps_num as f64 / self.fps_den as f64
    }

    /// Luma + chroma bytes of one frame body.
    pub fn frame_bytes(&self) -> u64 {
        let luma = self.geometry.width() as u64 * self.geometry.height() as u64;
        luma.saturating_add(self.colorspace.chroma_bytes(self.geometry))
    }

    pub fn encode(&self) -> String {
        format!(
            "{} W{} H{} F{}:{} Ip A1:1 C{}\n",
            Y4M_SIGNATURE,
            self.geometry.width(),
            self.geometry.height(),
            self.fps_num,
            self.fps_den,
            self.colorspace.tag(),
        )
    }

    /// Parse a stream header line. Unknown tags (`I`, `A`, `X...`) are skipped.
    pub fn parse(line: &[u8]) -> Result<Self, VideoError> {
        let line = std::str::from_utf8(line).map_err(|_| VideoError::BadSignature)?;
        let mut tokens = line.trim_end_matches('\n').split(' ');
        if tokens.next() != Some(Y4M_SIGNATURE) {
            return Err(VideoError::BadSignature);
        }

        let mut width = None;
        let mut height = None;
        let mut rate = None;
        // 4:2:0 when C is absent.
        let mut colorspace = Colorspace::C420;

        for tok in tokens.filter(|t| !t.is_empty()) {
            let mut chars = tok.chars();
            let key = chars.next();
            let val = chars.as_str();
            match key {
                Some('W') => width = Some(parse_u32(tok, val)?),
                Some('H') => height = Some(parse_u32(tok, val)?),
                Some('F') => rate = Some(parse_ratio(tok, val)?),
                Some('C') => colorspace = Colorspace::parse(val)?,
                _ => {}
            }
        }

        let width = width.ok_or(VideoError::MissingParameter('W'))?;
        let height = height.ok_or(VideoError::MissingParameter('H'))?;
        let (fps_num, fps_den) = rate.ok_or(VideoError::MissingParameter('F'))?;
        let geometry = FrameGeometry::new(width, height)?;

        let header = Self { geometry, fps_num, fps_den, colorspace };
        if header.frame_bytes() > MAX_FRAME_BYTES {
            return Err(VideoError::InvalidParameter(format!(
                "W{width} H{height} C{}: frame exceeds {MAX_FRAME_BYTES} bytes",
                colorspace.tag()
            )));
        }
        Ok(header)
    }
}

fn parse_u32(tok: &str, val: &str) -> Result<u32, VideoError> {
    val.parse().map_err(|_| VideoError::InvalidParameter(tok.to_owned()))
}

fn parse_ratio(tok: &str, val: &str) -> Result<(u32, u32), VideoError> {
    let (num, den) = val
        .split_once(':')
        .ok_or_else(|| VideoError::InvalidParameter(tok.to_owned()))?;
    let num = parse_u32(tok, num)?;
    let den = parse_u32(tok, den)?;
    if num == 0 || den == 0 {
        return Err(VideoError::InvalidParameter(tok.to_owned()));
    }
    Ok((num, den))
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Frame rate as a reduced rational: whole rates are `n:1`, others keep
/// three decimal places (`29.97` -> `2997:100`).
pub fn fps_to_ratio(fps: f64) -> Result<(u32, u32), VideoError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(VideoError::InvalidFrameRate(fps));
    }
    let (num, den) = if fps.fract() == 0.0 {
        (fps, 1.0)
    } else {
        ((fps * 1000.0).round(), 1000.0)
    };
    if num < 1.0 || num > u32::MAX as f64 {
        return Err(VideoError::InvalidFrameRate(fps));
    }
    let (num, den) = (num as u32, den as u32);
    let g = gcd(num, den);
    Ok((num / g, den / g))
}

/// Read one `\n`-terminated line, bounded. Returns bytes read (0 at EOF).
fn read_line<R: BufRead>(r: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    buf.clear();
    (&mut *r).take(MAX_HEADER_LINE).read_until(b'\n', buf)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

pub struct Y4mWriter<W: Write> {
    inner: W,
    header: Y4mHeader,
    header_written: bool,
    frames_written: u64,
}

impl Y4mWriter<Box<dyn Write + Send>> {
    pub fn create(sink: OutputSink, geometry: FrameGeometry, fps: f64) -> Result<Self, VideoError> {
        Self::new(open_output(sink)?, geometry, fps)
    }
}

impl<W: Write> Y4mWriter<W> {
    pub fn new(inner: W, geometry: FrameGeometry, fps: f64) -> Result<Self, VideoError> {
        let (fps_num, fps_den) = fps_to_ratio(fps)?;
        Ok(Self {
            inner,
            header: Y4mHeader { geometry, fps_num, fps_den, colorspace: Colorspace::Mono },
            header_written: false,
            frames_written: 0,
        })
    }

    pub fn header(&self) -> &Y4mHeader {
        &self.header
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn ensure_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            self.inner.write_all(self.header.encode().as_bytes())?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> FrameSink for Y4mWriter<W> {
    fn write_frame(&mut self, frame: &GrayFrame) -> Result<(), VideoError> {
        if frame.geometry() != self.header.geometry {
            return Err(FrameError::Shape {
                index: self.frames_written,
                expected: self.header.geometry,
                actual: frame.geometry(),
            }
            .into());
        }
        self.ensure_header()?;
        self.inner.write_all(FRAME_MARKER)?;
        self.inner.write_all(b"\n")?;
        self.inner.write_all(frame.pixels())?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        self.ensure_header()?;
        self.inner.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

pub struct Y4mReader<R: BufRead> {
    inner: R,
    header: Y4mHeader,
    header_len: u64,
    chroma_bytes: u64,
    frames_read: u64,
    stream_len: Option<u64>,
    line: Vec<u8>,
}

impl Y4mReader<Box<dyn BufRead + Send>> {
    /// Open a stream. File and in-memory inputs also report how many
    /// frames remain.
    pub fn open(src: InputSource) -> Result<Self, VideoError> {
        let stream_len = match &src {
            InputSource::File(p) => std::fs::metadata(p).ok().map(|m| m.len()),
            InputSource::Memory(b) => Some(b.len() as u64),
            InputSource::Reader(_) => None,
        };
        let reader = Self::new(open_input(src)?)?;
        Ok(match stream_len {
            Some(len) => reader.with_stream_len(len),
            None => reader,
        })
    }
}

impl<R: BufRead> Y4mReader<R> {
    pub fn new(mut inner: R) -> Result<Self, VideoError> {
        let mut line = Vec::new();
        if read_line(&mut inner, &mut line)? == 0 {
            return Err(VideoError::BadSignature);
        }
        let header = Y4mHeader::parse(&line)?;
        let header_len = line.len() as u64;
        let chroma_bytes = header.colorspace.chroma_bytes(header.geometry);
        tracing::debug!(
            geometry = %header.geometry,
            fps = header.fps(),
            colorspace = header.colorspace.tag(),
            "opened y4m stream"
        );
        Ok(Self {
            inner,
            header,
            header_len,
            chroma_bytes,
            frames_read: 0,
            stream_len: None,
            line,
        })
    }

    /// Total stream size in bytes, header included. Enables
    /// `remaining_hint`, assuming bare `FRAME` markers.
    pub fn with_stream_len(mut self, len: u64) -> Self {
        self.stream_len = Some(len);
        self
    }

    pub fn header(&self) -> &Y4mHeader {
        &self.header
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.header.geometry
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl<R: BufRead> FrameSource for Y4mReader<R> {
    fn read_frame(&mut self) -> Result<Option<GrayFrame>, VideoError> {
        let index = self.frames_read;
        if read_line(&mut self.inner, &mut self.line)? == 0 {
            return Ok(None);
        }
        if !self.line.starts_with(FRAME_MARKER) || self.line.last() != Some(&b'\n') {
            return Err(VideoError::BadFrameMarker { index });
        }

        let geometry = self.header.geometry;
        let mut pixels = vec![0u8; geometry.pixels_per_frame()];
        self.inner.read_exact(&mut pixels).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => VideoError::TruncatedFrame { index },
            _ => VideoError::Io(e),
        })?;

        let skipped = io::copy(&mut (&mut self.inner).take(self.chroma_bytes), &mut io::sink())?;
        if skipped != self.chroma_bytes {
            return Err(VideoError::TruncatedFrame { index });
        }

        self.frames_read += 1;
        Ok(Some(GrayFrame::from_parts(geometry, pixels)))
    }

    fn remaining_hint(&self) -> Option<u64> {
        let frame_len = FRAME_MARKER.len() as u64 + 1 + self.header.frame_bytes();
        let total = self.stream_len?.saturating_sub(self.header_len) / frame_len;
        Some(total.saturating_sub(self.frames_read))
    }
}
