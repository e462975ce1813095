//! Record sources and sinks.
//!
//! Every supported container is reduced to the same textual contract: an ordered stream
//! of SAM lines where header lines come first. [`RecordSource`] decodes plain SAM, gzip
//! compressed SAM and BAM (via `noodles`) into that stream; [`RecordSink`] encodes it
//! back into any of the three.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use noodles::sam::alignment::io::Write as AlignmentWrite;

use crate::errors::{DedupError, Result};
use crate::record::is_header_line;

/// Buffer size for text readers and writers.
const IO_BUFFER_SIZE: usize = 256 * 1024;

/// BGZF EOF marker block (empty block signaling end of file).
pub const BGZF_EOF: [u8; 28] = [
    0x1f, 0x8b, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x06, 0x00, 0x42, 0x43, 0x02, 0x00,
    0x1b, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Container formats understood by the source and sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    /// Plain SAM text
    Sam,
    /// Gzip (or BGZF) compressed SAM text
    SamGz,
    /// Binary BAM
    Bam,
}

impl AlignmentFormat {
    /// Infers the format from a file name; anything unrecognised is treated as SAM.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let name = path.as_ref().to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".bam") {
            Self::Bam
        } else if name.ends_with(".gz") {
            Self::SamGz
        } else {
            Self::Sam
        }
    }

    /// File extension used for outputs of this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Sam => "sam",
            Self::SamGz => "sam.gz",
            Self::Bam => "bam",
        }
    }
}

/// Returns the file name of `path` without its alignment extension.
///
/// # Examples
///
/// ```
/// use seqdedup_lib::io::file_stem;
///
/// assert_eq!(file_stem("/data/sample_1.bam"), "sample_1");
/// assert_eq!(file_stem("lane2.sam.gz"), "lane2");
/// assert_eq!(file_stem("reads.txt"), "reads.txt");
/// ```
#[must_use]
pub fn file_stem<P: AsRef<Path>>(path: P) -> String {
    let name = path
        .as_ref()
        .file_name()
        .map_or_else(|| path.as_ref().to_string_lossy(), |n| n.to_string_lossy())
        .into_owned();
    for ext in [".sam.gz", ".bam", ".sam", ".gz"] {
        if name.len() > ext.len() && name.to_ascii_lowercase().ends_with(ext) {
            return name[..name.len() - ext.len()].to_string();
        }
    }
    name
}

/// Returns true if the path refers to standard input.
///
/// Inputs are read more than once (preflight, then the main pass), so standard input
/// cannot be used as a source.
#[must_use]
pub fn is_stdin_path<P: AsRef<Path>>(path: P) -> bool {
    let path_str = path.as_ref().to_string_lossy();
    path_str == "-" || path_str == "/dev/stdin"
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| DedupError::io(format!("Failed to open input: {}", path.display()), e))
}

//////////////////////////////////////////////////////////////////////////////
// Decoder diagnostics
//////////////////////////////////////////////////////////////////////////////

/// Returns true if `head` starts with a BGZF block header (gzip with a `BC` extra field).
fn is_bgzf_header(head: &[u8]) -> bool {
    head.len() >= 16 && head[..4] == BGZF_EOF[..4] && head[12..14] == *b"BC"
}

/// Runs the container decoder in diagnostic mode and returns the messages it produced.
///
/// Messages follow the `[<severity>::<function>] <message>` convention used by htslib, so
/// callers can classify them without knowing which container produced them. Plain text
/// and non-BGZF gzip inputs carry no end-of-stream marker and produce no diagnostics.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn decoder_diagnostics<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let format = AlignmentFormat::from_path(path);
    if format == AlignmentFormat::Sam {
        return Ok(Vec::new());
    }

    let read_err = |e| DedupError::io(format!("Failed to read input: {}", path.display()), e);
    let mut file = open_file(path)?;
    let len = file.metadata().map_err(read_err)?.len();

    let mut head = [0u8; 18];
    let head_len = read_up_to(&mut file, &mut head).map_err(read_err)?;
    let head = &head[..head_len];

    let mut diagnostics = Vec::new();
    if !is_bgzf_header(head) {
        if format == AlignmentFormat::Bam {
            diagnostics.push("[E::hts_open_format] Input is not BGZF compressed".to_string());
        }
        return Ok(diagnostics);
    }

    let eof_len = BGZF_EOF.len() as u64;
    let has_eof_marker = if len < eof_len {
        false
    } else {
        let mut tail = [0u8; 28];
        file.seek(SeekFrom::Start(len - eof_len)).map_err(read_err)?;
        file.read_exact(&mut tail).map_err(read_err)?;
        tail == BGZF_EOF
    };
    if !has_eof_marker {
        diagnostics.push(
            "[W::bam_hdr_read] EOF marker is absent. The input is probably truncated".to_string(),
        );
    }

    if format == AlignmentFormat::Bam {
        let mut reader = bam::io::Reader::new(BufReader::new(open_file(path)?));
        if let Err(e) = reader.read_header() {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                diagnostics.push(format!(
                    "[E::bgzf_read] Read block operation failed with error: {e}; file truncated"
                ));
            } else {
                diagnostics.push(format!("[E::bam_hdr_read] Invalid BAM binary header: {e}"));
            }
        }
    }

    Ok(diagnostics)
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

//////////////////////////////////////////////////////////////////////////////
// Source
//////////////////////////////////////////////////////////////////////////////

enum SourceInner {
    Text {
        reader: Box<dyn BufRead>,
        buf: String,
    },
    Bam {
        reader: bam::io::Reader<bgzf::io::Reader<BufReader<File>>>,
        header: sam::Header,
        record: bam::Record,
        pending: VecDeque<String>,
        renderer: sam::io::Writer<Vec<u8>>,
    },
}

/// A lazy, finite, non-restartable stream of SAM lines (without line terminators).
///
/// Blank lines are skipped. Header lines are yielded in file order before the first data
/// line, exactly as the underlying container stores them.
pub struct RecordSource {
    inner: SourceInner,
}

impl RecordSource {
    /// Opens `path`, choosing the decoder from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or, for BAM, its header cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match AlignmentFormat::from_path(path) {
            AlignmentFormat::Sam => {
                Ok(Self::from_reader(BufReader::with_capacity(IO_BUFFER_SIZE, open_file(path)?)))
            }
            AlignmentFormat::SamGz => {
                let decoder = MultiGzDecoder::new(BufReader::new(open_file(path)?));
                Ok(Self::from_reader(BufReader::with_capacity(IO_BUFFER_SIZE, decoder)))
            }
            AlignmentFormat::Bam => Self::open_bam(path),
        }
    }

    fn open_bam(path: &Path) -> Result<Self> {
        let mut reader = bam::io::Reader::new(BufReader::new(open_file(path)?));
        let header = reader.read_header().map_err(|e| {
            DedupError::io(format!("Failed to read header from: {}", path.display()), e)
        })?;

        let mut renderer = sam::io::Writer::new(Vec::new());
        renderer.write_header(&header).map_err(|e| {
            DedupError::io(format!("Failed to render header of: {}", path.display()), e)
        })?;
        let text = String::from_utf8_lossy(renderer.get_ref()).into_owned();
        let pending = text.lines().map(str::to_string).collect();
        renderer.get_mut().clear();

        Ok(Self {
            inner: SourceInner::Bam {
                reader,
                header,
                record: bam::Record::default(),
                pending,
                renderer,
            },
        })
    }

    /// Wraps an already-decoded SAM text stream.
    pub fn from_reader<R: BufRead + 'static>(reader: R) -> Self {
        Self { inner: SourceInner::Text { reader: Box::new(reader), buf: String::new() } }
    }

    /// Returns the next line, or `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream cannot be read or decoded.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        match &mut self.inner {
            SourceInner::Text { reader, buf } => loop {
                buf.clear();
                let n = reader
                    .read_line(buf)
                    .map_err(|e| DedupError::io("Failed to read alignment records", e))?;
                if n == 0 {
                    break Ok(None);
                }
                let line = buf.trim_end_matches(['\n', '\r']);
                if !line.is_empty() {
                    break Ok(Some(line.to_string()));
                }
            },
            SourceInner::Bam { reader, header, record, pending, renderer } => {
                if let Some(line) = pending.pop_front() {
                    Ok(Some(line))
                } else {
                    let n = reader
                        .read_record(record)
                        .map_err(|e| DedupError::io("Failed to decode BAM record", e))?;
                    if n == 0 {
                        Ok(None)
                    } else {
                        renderer.get_mut().clear();
                        renderer
                            .write_alignment_record(header, &*record)
                            .map_err(|e| DedupError::io("Failed to render BAM record as SAM", e))?;
                        let text = String::from_utf8_lossy(renderer.get_ref());
                        Ok(Some(text.trim_end_matches('\n').to_string()))
                    }
                }
            }
        }
    }
}

impl Iterator for RecordSource {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

//////////////////////////////////////////////////////////////////////////////
// Sink
//////////////////////////////////////////////////////////////////////////////

enum SinkInner {
    Text(Box<dyn Write>),
    Gz(GzEncoder<BufWriter<File>>),
    Bam {
        writer: bam::io::Writer<bgzf::io::Writer<File>>,
        header_text: String,
        header: Option<sam::Header>,
    },
}

/// Writes SAM lines to a SAM, gzip SAM or BAM container.
///
/// Header lines are written in the order they are received. For BAM the header lines
/// are collected and encoded when the first data line arrives (or on [`finish`]).
///
/// [`finish`]: RecordSink::finish
pub struct RecordSink {
    inner: SinkInner,
    header_lines: u64,
    data_lines: u64,
}

impl RecordSink {
    /// Creates `path` and writes to it in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, format: AlignmentFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| DedupError::io(format!("Failed to create output: {}", path.display()), e))?;

        let inner = match format {
            AlignmentFormat::Sam => {
                SinkInner::Text(Box::new(BufWriter::with_capacity(IO_BUFFER_SIZE, file)))
            }
            AlignmentFormat::SamGz => SinkInner::Gz(GzEncoder::new(
                BufWriter::with_capacity(IO_BUFFER_SIZE, file),
                Compression::default(),
            )),
            AlignmentFormat::Bam => SinkInner::Bam {
                writer: bam::io::Writer::new(file),
                header_text: String::new(),
                header: None,
            },
        };
        Ok(Self { inner, header_lines: 0, data_lines: 0 })
    }

    /// Writes plain SAM text to an arbitrary writer.
    pub fn from_writer<W: Write + 'static>(writer: W) -> Self {
        Self { inner: SinkInner::Text(Box::new(writer)), header_lines: 0, data_lines: 0 }
    }

    #[must_use]
    pub fn header_lines(&self) -> u64 {
        self.header_lines
    }

    #[must_use]
    pub fn data_lines(&self) -> u64 {
        self.data_lines
    }

    /// Forwards a header line verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure, or for BAM when a header line follows data.
    pub fn write_header_line(&mut self, line: &str) -> Result<()> {
        debug_assert!(is_header_line(line));
        match &mut self.inner {
            SinkInner::Text(w) => write_line(w, line)?,
            SinkInner::Gz(w) => write_line(w, line)?,
            SinkInner::Bam { header_text, header, .. } => {
                if header.is_some() {
                    return Err(DedupError::InvalidFileFormat {
                        file_type: "BAM".to_string(),
                        path: "output".to_string(),
                        reason: format!("header line after alignment records: {line}"),
                    });
                }
                header_text.push_str(line);
                header_text.push('\n');
            }
        }
        self.header_lines += 1;
        Ok(())
    }

    /// Writes one data line verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure or, for BAM, if the line cannot be encoded.
    pub fn write_data_line(&mut self, line: &str) -> Result<()> {
        match &mut self.inner {
            SinkInner::Text(w) => write_line(w, line)?,
            SinkInner::Gz(w) => write_line(w, line)?,
            SinkInner::Bam { writer, header_text, header } => {
                let header = match header {
                    Some(h) => h,
                    None => header.insert(encode_bam_header(writer, header_text)?),
                };
                let mut reader = sam::io::Reader::new(line.as_bytes());
                let mut record = sam::Record::default();
                reader
                    .read_record(&mut record)
                    .map_err(|e| DedupError::io(format!("Failed to parse record: {line}"), e))?;
                writer
                    .write_alignment_record(header, &record)
                    .map_err(|e| DedupError::io("Failed to write BAM record", e))?;
            }
        }
        self.data_lines += 1;
        Ok(())
    }

    /// Flushes and closes the container.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered data cannot be written.
    pub fn finish(self) -> Result<()> {
        let err = |e| DedupError::io("Failed to finalize output", e);
        match self.inner {
            SinkInner::Text(mut w) => w.flush().map_err(err)?,
            SinkInner::Gz(w) => {
                let mut inner = w.finish().map_err(err)?;
                inner.flush().map_err(err)?;
            }
            SinkInner::Bam { mut writer, header_text, header } => {
                let header = match header {
                    Some(h) => h,
                    None => encode_bam_header(&mut writer, &header_text)?,
                };
                writer.finish(&header).map_err(err)?;
            }
        }
        Ok(())
    }
}

fn write_line<W: Write + ?Sized>(writer: &mut W, line: &str) -> Result<()> {
    writer
        .write_all(line.as_bytes())
        .and_then(|()| writer.write_all(b"\n"))
        .map_err(|e| DedupError::io("Failed to write output record", e))
}

fn encode_bam_header(
    writer: &mut bam::io::Writer<bgzf::io::Writer<File>>,
    header_text: &str,
) -> Result<sam::Header> {
    let header: sam::Header = header_text.parse().map_err(|e| DedupError::InvalidFileFormat {
        file_type: "SAM header".to_string(),
        path: "output".to_string(),
        reason: format!("{e}"),
    })?;
    writer.write_header(&header).map_err(|e| DedupError::io("Failed to write BAM header", e))?;
    Ok(header)
}
