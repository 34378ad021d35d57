//! Reader for the fixed-layout binary SPE instrument format (versions < 3).
//!
//! The whole file is loaded into memory and every field is read at a fixed
//! little-endian byte offset.  Frames start at [`DATA_OFFSET`] and are stored
//! back to back, `width * height` elements each.

use std::fmt;
use std::path::Path;

use super::model::FileTable;
use crate::error::{PipelineError, SpeError};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

const OFFSET_EXPOSURE: usize = 10;
const OFFSET_LOCAL_DATE: usize = 20;
const LEN_LOCAL_DATE: usize = 16;
const OFFSET_FRAME_WIDTH: usize = 42;
const OFFSET_CENTER_WAVELENGTH: usize = 72;
const OFFSET_DATA_TYPE: usize = 108;
const OFFSET_BACKGROUND: usize = 150;
const OFFSET_LOCAL_TIME: usize = 172;
const OFFSET_UTC_TIME: usize = 179;
const LEN_TIME: usize = 6;
const OFFSET_GRATING: usize = 650;
const GRATING_ENTRIES: usize = 32;
const OFFSET_FRAME_HEIGHT: usize = 656;
const OFFSET_METADATA_TABLE: usize = 678;
const METADATA_ENTRIES: usize = 64;
const OFFSET_FRAME_COUNT: usize = 1446;
const OFFSET_VERSION: usize = 1992;
const OFFSET_AXIS_START: usize = 3183;
const OFFSET_AXIS_STOP: usize = 3199;
const OFFSET_LASER: usize = 3311;

/// Byte offset of the first frame.
pub const DATA_OFFSET: usize = 4100;

/// First format version whose layout is not handled.
const FIRST_UNSUPPORTED_VERSION: f64 = 3.0;

// ---------------------------------------------------------------------------
// Data type
// ---------------------------------------------------------------------------

/// Element encoding selected by the header's data-type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeDataType {
    F32,
    I32,
    I16,
    U16,
    F64,
    U8,
    U32,
}

impl SpeDataType {
    pub fn from_code(code: i16) -> Result<Self, SpeError> {
        match code {
            0 => Ok(SpeDataType::F32),
            1 => Ok(SpeDataType::I32),
            2 => Ok(SpeDataType::I16),
            3 => Ok(SpeDataType::U16),
            5 => Ok(SpeDataType::F64),
            6 => Ok(SpeDataType::U8),
            8 => Ok(SpeDataType::U32),
            other => Err(SpeError::UnsupportedFormat(format!(
                "data type code {other}"
            ))),
        }
    }

    pub fn code(self) -> i16 {
        match self {
            SpeDataType::F32 => 0,
            SpeDataType::I32 => 1,
            SpeDataType::I16 => 2,
            SpeDataType::U16 => 3,
            SpeDataType::F64 => 5,
            SpeDataType::U8 => 6,
            SpeDataType::U32 => 8,
        }
    }

    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            SpeDataType::U8 => 1,
            SpeDataType::I16 | SpeDataType::U16 => 2,
            SpeDataType::F32 | SpeDataType::I32 | SpeDataType::U32 => 4,
            SpeDataType::F64 => 8,
        }
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Decoded SPE header.  Only produced for supported versions.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeHeader {
    /// Format version rounded to one decimal.
    pub version: f64,
    pub data_type: SpeDataType,
    pub frame_width: u16,
    pub frame_height: u16,
    pub frame_count: usize,
    pub metadata_table: Vec<u64>,
    pub laser_wavelength: f64,
    pub local_date: String,
    /// `HH:MM:SS`
    pub local_time: String,
    pub utc_time: String,
    pub exposure_time: f32,
    pub center_wavelength: f32,
    pub grating: Vec<f32>,
    pub background_corrected: bool,
    pub axis_start: f64,
    pub axis_stop: f64,
}

impl SpeHeader {
    /// Samples per frame.
    pub fn pixel_count(&self) -> usize {
        self.frame_width as usize * self.frame_height as usize
    }

    /// Byte offset of frame `index`.
    pub fn frame_offset(&self, index: usize) -> Option<usize> {
        index
            .checked_mul(self.frame_bytes()?)?
            .checked_add(DATA_OFFSET)
    }

    fn frame_bytes(&self) -> Option<usize> {
        self.pixel_count().checked_mul(self.data_type.size())
    }

    /// Groove density of the active grating.
    pub fn grating_density(&self) -> f32 {
        self.grating.first().copied().unwrap_or_default()
    }

    /// Calibrated measurement axis, one value per pixel.
    pub fn axis(&self) -> Vec<f64> {
        let count = self.pixel_count();
        let step = if count > 1 {
            (self.axis_stop - self.axis_start) / (count - 1) as f64
        } else {
            0.0
        };
        (0..count).map(|j| self.axis_start + j as f64 * step).collect()
    }
}

impl fmt::Display for SpeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SPE version: {}", self.version)?;
        writeln!(f, "Acquired: {} {}", self.local_date, self.local_time)?;
        writeln!(f, "Laser wavelength: {}", self.laser_wavelength)?;
        writeln!(f, "Exposure time (s): {}", self.exposure_time)?;
        writeln!(f, "Grating: {} l/mm", self.grating_density())?;
        writeln!(f, "Background correction: {}", self.background_corrected)?;
        write!(
            f,
            "Frames: {} x {}x{} ({:?})",
            self.frame_count, self.frame_width, self.frame_height, self.data_type
        )
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// One acquired frame, typed as stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    F32(Vec<f32>),
    I32(Vec<i32>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    F64(Vec<f64>),
    U8(Vec<u8>),
    U32(Vec<u32>),
}

impl Frame {
    fn decode(data_type: SpeDataType, bytes: &[u8]) -> Frame {
        match data_type {
            SpeDataType::F32 => Frame::F32(decode_le(bytes, f32::from_le_bytes)),
            SpeDataType::I32 => Frame::I32(decode_le(bytes, i32::from_le_bytes)),
            SpeDataType::I16 => Frame::I16(decode_le(bytes, i16::from_le_bytes)),
            SpeDataType::U16 => Frame::U16(decode_le(bytes, u16::from_le_bytes)),
            SpeDataType::F64 => Frame::F64(decode_le(bytes, f64::from_le_bytes)),
            SpeDataType::U8 => Frame::U8(bytes.to_vec()),
            SpeDataType::U32 => Frame::U32(decode_le(bytes, u32::from_le_bytes)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frame::F32(v) => v.len(),
            Frame::I32(v) => v.len(),
            Frame::I16(v) => v.len(),
            Frame::U16(v) => v.len(),
            Frame::F64(v) => v.len(),
            Frame::U8(v) => v.len(),
            Frame::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Frame::F32(v) => v.iter().map(|&s| s as f64).collect(),
            Frame::I32(v) => v.iter().map(|&s| s as f64).collect(),
            Frame::I16(v) => v.iter().map(|&s| s as f64).collect(),
            Frame::U16(v) => v.iter().map(|&s| s as f64).collect(),
            Frame::F64(v) => v.clone(),
            Frame::U8(v) => v.iter().map(|&s| s as f64).collect(),
            Frame::U32(v) => v.iter().map(|&s| s as f64).collect(),
        }
    }
}

fn decode_le<T, const N: usize>(bytes: &[u8], from_le: fn([u8; N]) -> T) -> Vec<T> {
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(chunk);
            from_le(raw)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Byte access with bounds checks
// ---------------------------------------------------------------------------

struct ByteReader<'a> {
    buf: &'a [u8],
}

impl<'a> ByteReader<'a> {
    fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], SpeError> {
        offset
            .checked_add(len)
            .and_then(|end| self.buf.get(offset..end))
            .ok_or_else(|| {
                SpeError::CorruptFile(format!(
                    "need {len} bytes at offset {offset}, file has {}",
                    self.buf.len()
                ))
            })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], SpeError> {
        let mut raw = [0u8; N];
        raw.copy_from_slice(self.bytes(offset, N)?);
        Ok(raw)
    }

    fn f32(&self, offset: usize) -> Result<f32, SpeError> {
        self.array(offset).map(f32::from_le_bytes)
    }

    fn f64(&self, offset: usize) -> Result<f64, SpeError> {
        self.array(offset).map(f64::from_le_bytes)
    }

    fn i16(&self, offset: usize) -> Result<i16, SpeError> {
        self.array(offset).map(i16::from_le_bytes)
    }

    fn u16(&self, offset: usize) -> Result<u16, SpeError> {
        self.array(offset).map(u16::from_le_bytes)
    }

    fn i32(&self, offset: usize) -> Result<i32, SpeError> {
        self.array(offset).map(i32::from_le_bytes)
    }

    fn text(&self, offset: usize, len: usize) -> Result<String, SpeError> {
        let raw = self.bytes(offset, len)?;
        Ok(String::from_utf8_lossy(raw)
            .trim_end_matches('\0')
            .to_string())
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode the header of an in-memory SPE file.
pub fn decode_header(buf: &[u8]) -> Result<SpeHeader, SpeError> {
    let r = ByteReader { buf };

    let version = (r.f32(OFFSET_VERSION)? as f64 * 10.0).round() / 10.0;
    if version.is_nan() || version >= FIRST_UNSUPPORTED_VERSION {
        return Err(SpeError::UnsupportedFormat(format!("version {version}")));
    }

    let data_type = SpeDataType::from_code(r.i16(OFFSET_DATA_TYPE)?)?;
    let frame_width = r.u16(OFFSET_FRAME_WIDTH)?;
    let frame_height = r.u16(OFFSET_FRAME_HEIGHT)?;
    let frame_count = r.i32(OFFSET_FRAME_COUNT)?;
    let frame_count = usize::try_from(frame_count)
        .map_err(|_| SpeError::CorruptFile(format!("negative frame count {frame_count}")))?;
    if frame_width == 0 || frame_height == 0 {
        return Err(SpeError::CorruptFile(format!(
            "empty frame geometry {frame_width}x{frame_height}"
        )));
    }

    let metadata_table = r
        .bytes(OFFSET_METADATA_TABLE, METADATA_ENTRIES * 8)
        .map(|raw| decode_le(raw, u64::from_le_bytes))?;
    let grating = r
        .bytes(OFFSET_GRATING, GRATING_ENTRIES * 4)
        .map(|raw| decode_le(raw, f32::from_le_bytes))?;

    let raw_time = r.text(OFFSET_LOCAL_TIME, LEN_TIME)?;
    let local_time = format_clock(&raw_time);

    Ok(SpeHeader {
        version,
        data_type,
        frame_width,
        frame_height,
        frame_count,
        metadata_table,
        laser_wavelength: r.f64(OFFSET_LASER)?,
        local_date: r.text(OFFSET_LOCAL_DATE, LEN_LOCAL_DATE)?,
        local_time,
        utc_time: r.text(OFFSET_UTC_TIME, LEN_TIME)?,
        exposure_time: r.f32(OFFSET_EXPOSURE)?,
        center_wavelength: r.f32(OFFSET_CENTER_WAVELENGTH)?,
        grating,
        background_corrected: r.i32(OFFSET_BACKGROUND)? != 0,
        axis_start: r.f64(OFFSET_AXIS_START)?,
        axis_stop: r.f64(OFFSET_AXIS_STOP)?,
    })
}

/// `HHMMSS` → `HH:MM:SS`; anything shorter is returned as is.
fn format_clock(raw: &str) -> String {
    match (raw.get(..2), raw.get(2..4), raw.get(4..)) {
        (Some(h), Some(m), Some(s)) if !s.is_empty() => format!("{h}:{m}:{s}"),
        _ => raw.to_string(),
    }
}

/// A fully decoded SPE file.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeFile {
    pub header: SpeHeader,
    pub axis: Vec<f64>,
    pub frames: Vec<Frame>,
}

impl SpeFile {
    /// Axis values rounded for display, e.g. `"532.07"` for `precision = 2`.
    pub fn axis_labels(&self, precision: usize) -> Vec<String> {
        self.axis.iter().map(|v| format!("{v:.precision$}")).collect()
    }

    /// Frames as acquisition columns `1..=frame_count` sharing the axis.
    ///
    /// Rows holding a NaN in the axis or in any frame are dropped, as for
    /// text files.
    pub fn to_table(&self, source: &Path) -> FileTable {
        let frames: Vec<Vec<f64>> = self.frames.iter().map(Frame::to_f64).collect();
        let keep: Vec<usize> = (0..self.axis.len())
            .filter(|&r| {
                !self.axis[r].is_nan()
                    && frames.iter().all(|f| f.get(r).is_some_and(|v| !v.is_nan()))
            })
            .collect();

        let dropped = self.axis.len() - keep.len();
        if dropped > 0 {
            log::debug!("{}: dropped {dropped} row(s) with NaN samples", source.display());
        }

        FileTable {
            source: source.to_path_buf(),
            axis: keep.iter().map(|&r| self.axis[r]).collect(),
            columns: frames
                .iter()
                .map(|f| keep.iter().map(|&r| f[r]).collect())
                .collect(),
        }
    }
}

/// Decode header, axis and all frames of an in-memory SPE file.
pub fn decode(buf: &[u8]) -> Result<SpeFile, SpeError> {
    let header = decode_header(buf)?;
    let frame_bytes = header
        .frame_bytes()
        .ok_or_else(|| SpeError::CorruptFile("frame size overflows".to_string()))?;

    let mut frames = Vec::with_capacity(header.frame_count);
    for i in 0..header.frame_count {
        let start = header
            .frame_offset(i)
            .ok_or_else(|| SpeError::CorruptFile(format!("frame {i} offset overflows")))?;
        let raw = ByteReader { buf }.bytes(start, frame_bytes)?;
        frames.push(Frame::decode(header.data_type, raw));
    }

    Ok(SpeFile {
        axis: header.axis(),
        header,
        frames,
    })
}

/// Read an SPE file from disk (whole buffer) and decode it.
pub fn read_spe(path: &Path) -> Result<SpeFile, PipelineError> {
    let buf = std::fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    let spe = decode(&buf).map_err(|e| PipelineError::from_spe(path, e))?;
    log::debug!(
        "{}: SPE v{} with {} frame(s) of {} samples",
        path.display(),
        spe.header.version,
        spe.frames.len(),
        spe.header.pixel_count()
    );
    Ok(spe)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Builds a version-2.x SPE buffer.  Used for fixtures and sample data.
#[derive(Debug, Clone)]
pub struct SpeWriter {
    pub version: f32,
    pub data_type: SpeDataType,
    pub frame_width: u16,
    pub frame_height: u16,
    pub laser_wavelength: f64,
    pub exposure_time: f32,
    pub center_wavelength: f32,
    pub grating: f32,
    pub background_corrected: bool,
    pub axis_start: f64,
    pub axis_stop: f64,
    pub local_date: String,
    /// `HHMMSS`
    pub local_time: String,
    pub utc_time: String,
    frames: Vec<Vec<f64>>,
}

impl SpeWriter {
    pub fn new(frame_width: u16, frame_height: u16, data_type: SpeDataType) -> Self {
        Self {
            version: 2.5,
            data_type,
            frame_width,
            frame_height,
            laser_wavelength: 532.0,
            exposure_time: 1.0,
            center_wavelength: 600.0,
            grating: 600.0,
            background_corrected: false,
            axis_start: 0.0,
            axis_stop: 1.0,
            local_date: "18Oct2026".to_string(),
            local_time: "120000".to_string(),
            utc_time: "100000".to_string(),
            frames: Vec::new(),
        }
    }

    pub fn axis(mut self, start: f64, stop: f64) -> Self {
        self.axis_start = start;
        self.axis_stop = stop;
        self
    }

    /// Append a frame; values are cast to the configured element type.
    pub fn frame(mut self, samples: Vec<f64>) -> Self {
        self.frames.push(samples);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let count = self.frame_width as usize * self.frame_height as usize;
        let size = self.data_type.size();
        let mut buf = vec![0u8; DATA_OFFSET + self.frames.len() * count * size];

        put(&mut buf, OFFSET_VERSION, &self.version.to_le_bytes());
        put(&mut buf, OFFSET_DATA_TYPE, &self.data_type.code().to_le_bytes());
        put(&mut buf, OFFSET_FRAME_WIDTH, &self.frame_width.to_le_bytes());
        put(&mut buf, OFFSET_FRAME_COUNT, &(self.frames.len() as i32).to_le_bytes());
        put(&mut buf, OFFSET_LASER, &self.laser_wavelength.to_le_bytes());
        put_text(&mut buf, OFFSET_LOCAL_DATE, LEN_LOCAL_DATE, &self.local_date);
        put_text(&mut buf, OFFSET_LOCAL_TIME, LEN_TIME, &self.local_time);
        put_text(&mut buf, OFFSET_UTC_TIME, LEN_TIME, &self.utc_time);
        put(&mut buf, OFFSET_EXPOSURE, &self.exposure_time.to_le_bytes());
        put(&mut buf, OFFSET_CENTER_WAVELENGTH, &self.center_wavelength.to_le_bytes());
        put(&mut buf, OFFSET_GRATING, &self.grating.to_le_bytes());
        // The height field lives inside the grating table, so it goes last.
        put(&mut buf, OFFSET_FRAME_HEIGHT, &self.frame_height.to_le_bytes());
        put(&mut buf, OFFSET_BACKGROUND, &i32::from(self.background_corrected).to_le_bytes());
        put(&mut buf, OFFSET_AXIS_START, &self.axis_start.to_le_bytes());
        put(&mut buf, OFFSET_AXIS_STOP, &self.axis_stop.to_le_bytes());

        for (i, frame) in self.frames.iter().enumerate() {
            let mut offset = DATA_OFFSET + i * count * size;
            for &v in frame.iter().take(count) {
                let raw = encode_sample(self.data_type, v);
                put(&mut buf, offset, &raw);
                offset += size;
            }
        }
        buf
    }

    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())
    }
}

fn put(buf: &mut [u8], offset: usize, raw: &[u8]) {
    buf[offset..offset + raw.len()].copy_from_slice(raw);
}

fn put_text(buf: &mut [u8], offset: usize, len: usize, text: &str) {
    let raw = text.as_bytes();
    let n = raw.len().min(len);
    put(buf, offset, &raw[..n]);
}

fn encode_sample(data_type: SpeDataType, v: f64) -> Vec<u8> {
    match data_type {
        SpeDataType::F32 => (v as f32).to_le_bytes().to_vec(),
        SpeDataType::I32 => (v as i32).to_le_bytes().to_vec(),
        SpeDataType::I16 => (v as i16).to_le_bytes().to_vec(),
        SpeDataType::U16 => (v as u16).to_le_bytes().to_vec(),
        SpeDataType::F64 => v.to_le_bytes().to_vec(),
        SpeDataType::U8 => vec![v as u8],
        SpeDataType::U32 => (v as u32).to_le_bytes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn two_frame_u16() -> SpeWriter {
        SpeWriter::new(5, 1, SpeDataType::U16)
            .axis(500.0, 504.0)
            .frame(vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .frame(vec![10.0, 20.0, 30.0, 40.0, 50.0])
    }

    #[test]
    fn test_decode_header_fields() {
        let mut w = two_frame_u16();
        w.background_corrected = true;
        w.exposure_time = 0.5;
        let header = decode_header(&w.to_bytes()).unwrap();

        assert_eq!(header.version, 2.5);
        assert_eq!(header.data_type, SpeDataType::U16);
        assert_eq!(header.frame_width, 5);
        assert_eq!(header.frame_height, 1);
        assert_eq!(header.frame_count, 2);
        assert_eq!(header.laser_wavelength, 532.0);
        assert_eq!(header.exposure_time, 0.5);
        assert_eq!(header.local_date, "18Oct2026");
        assert_eq!(header.local_time, "12:00:00");
        assert_eq!(header.utc_time, "100000");
        assert_eq!(header.metadata_table.len(), 64);
        assert_eq!(header.grating.len(), 32);
        assert_eq!(header.grating_density(), 600.0);
        assert!(header.background_corrected);
    }

    #[test]
    fn test_decode_header_is_deterministic() {
        let bytes = two_frame_u16().to_bytes();
        assert_eq!(decode_header(&bytes).unwrap(), decode_header(&bytes).unwrap());
    }

    #[test]
    fn test_axis_calibration() {
        let spe = decode(&two_frame_u16().to_bytes()).unwrap();
        assert_eq!(spe.axis, vec![500.0, 501.0, 502.0, 503.0, 504.0]);
    }

    #[test]
    fn test_axis_labels_rounded() {
        let w = SpeWriter::new(3, 1, SpeDataType::F32)
            .axis(1.0, 2.0)
            .frame(vec![0.0; 3]);
        let spe = decode(&w.to_bytes()).unwrap();
        assert_eq!(spe.axis_labels(2), vec!["1.00", "1.50", "2.00"]);
        // full precision kept for numeric work
        assert_eq!(spe.axis[1], 1.5);
    }

    #[test]
    fn test_frames_in_file_order() {
        let spe = decode(&two_frame_u16().to_bytes()).unwrap();
        assert_eq!(spe.frames.len(), 2);
        assert_eq!(spe.frames[0], Frame::U16(vec![1, 2, 3, 4, 5]));
        assert_eq!(spe.frames[1].to_f64(), vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_every_supported_data_type() {
        for dt in [
            SpeDataType::F32,
            SpeDataType::I32,
            SpeDataType::I16,
            SpeDataType::U16,
            SpeDataType::F64,
            SpeDataType::U8,
            SpeDataType::U32,
        ] {
            let w = SpeWriter::new(2, 2, dt).frame(vec![1.0, 2.0, 3.0, 250.0]);
            let spe = decode(&w.to_bytes()).unwrap();
            assert_eq!(spe.header.data_type, dt);
            assert_eq!(spe.frames[0].len(), 4);
            assert_eq!(spe.frames[0].to_f64(), vec![1.0, 2.0, 3.0, 250.0], "{dt:?}");
        }
    }

    #[test]
    fn test_signed_samples() {
        let w = SpeWriter::new(2, 1, SpeDataType::I16).frame(vec![-3.0, 7.0]);
        let spe = decode(&w.to_bytes()).unwrap();
        assert_eq!(spe.frames[0], Frame::I16(vec![-3, 7]));
    }

    #[test]
    fn test_unknown_data_type_codes_rejected() {
        for code in [4i16, 7, 9, -1] {
            let mut bytes = two_frame_u16().to_bytes();
            put(&mut bytes, OFFSET_DATA_TYPE, &code.to_le_bytes());
            match decode(&bytes) {
                Err(SpeError::UnsupportedFormat(msg)) => assert!(msg.contains("data type")),
                other => panic!("code {code}: expected UnsupportedFormat, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_version_three_rejected() {
        let mut w = two_frame_u16();
        w.version = 3.0;
        assert!(matches!(
            decode(&w.to_bytes()),
            Err(SpeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_truncated_header_is_corrupt() {
        let bytes = two_frame_u16().to_bytes();
        assert!(matches!(
            decode_header(&bytes[..2000]),
            Err(SpeError::CorruptFile(_))
        ));
    }

    #[test]
    fn test_truncated_frames_are_corrupt() {
        let bytes = two_frame_u16().to_bytes();
        let cut = &bytes[..bytes.len() - 1];
        assert!(decode_header(cut).is_ok());
        assert!(matches!(decode(cut), Err(SpeError::CorruptFile(_))));
    }

    #[test]
    fn test_zero_width_is_corrupt() {
        let w = SpeWriter::new(0, 1, SpeDataType::U16);
        assert!(matches!(
            decode(&w.to_bytes()),
            Err(SpeError::CorruptFile(_))
        ));
    }

    #[test]
    fn test_single_pixel_axis() {
        let w = SpeWriter::new(1, 1, SpeDataType::F32)
            .axis(42.0, 50.0)
            .frame(vec![3.0]);
        let spe = decode(&w.to_bytes()).unwrap();
        assert_eq!(spe.axis, vec![42.0]);
    }

    #[test]
    fn test_read_spe_reports_path() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), vec![0u8; 100]).unwrap();
        let err = read_spe(file.path()).unwrap_err();
        match &err {
            PipelineError::CorruptFile { path, .. } => assert_eq!(path, file.path()),
            other => panic!("expected CorruptFile, got {other:?}"),
        }
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_to_table_columns() {
        let file = NamedTempFile::new().unwrap();
        two_frame_u16().write(file.path()).unwrap();
        let spe = read_spe(file.path()).unwrap();
        let table = spe.to_table(file.path());
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.column_names(), vec!["x", "y1", "y2"]);
        assert_eq!(table.axis.len(), 5);
    }

    #[test]
    fn test_to_table_drops_nan_rows() {
        let w = SpeWriter::new(4, 1, SpeDataType::F32)
            .axis(1.0, 4.0)
            .frame(vec![1.0, f64::NAN, 1.0, 1.0])
            .frame(vec![2.0, 2.0, 2.0, 2.0]);
        let spe = decode(&w.to_bytes()).unwrap();
        let table = spe.to_table(Path::new("nan.spe"));
        assert_eq!(table.axis, vec![1.0, 3.0, 4.0]);
        assert_eq!(table.columns, vec![vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]]);
    }

    #[test]
    fn test_header_summary() {
        let header = decode_header(&two_frame_u16().to_bytes()).unwrap();
        let text = header.to_string();
        assert!(text.contains("SPE version: 2.5"));
        assert!(text.contains("Grating: 600 l/mm"));
    }
}
