//! Nutrition-label images
//!
//! Uploaded label photos are kept as `data:` URLs so they can be dropped
//! straight into an `<img src>`. Only PNG and JPEG are accepted, matching the
//! `accept` filter of the upload control.
//!
//! Decoding a file is the one asynchronous step of the pipeline. An
//! [`ImageLoader`] reads and encodes files on background threads and hands
//! the results back through a channel so the host can feed them to the
//! render driver from its own thread.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

use crate::store::IngredientId;
use crate::{Error, Result};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Image formats accepted by the upload control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageMime {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl ImageMime {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
        }
    }

    /// Identify the format from the leading bytes of a file
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(ImageMime::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(ImageMime::Jpeg)
        } else {
            None
        }
    }

    fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageMime::Png),
            "image/jpeg" | "image/jpg" => Some(ImageMime::Jpeg),
            _ => None,
        }
    }
}

/// An attached nutrition-label photo, held as a base64 `data:` URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NutritionImage {
    mime: ImageMime,
    data_url: String,
}

impl NutritionImage {
    /// Encode raw PNG/JPEG bytes. The format is detected from the content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::ImageDecodeError("empty image file".into()));
        }
        let mime = ImageMime::sniff(bytes).ok_or_else(|| {
            Error::UnsupportedImageType("expected PNG or JPEG content".into())
        })?;
        let data_url = format!("data:{};base64,{}", mime.as_str(), BASE64.encode(bytes));
        Ok(Self { mime, data_url })
    }

    /// Accept an already-encoded `data:image/...;base64,` URL
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| Error::ImageDecodeError("not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::ImageDecodeError("data URL has no payload".into()))?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::ImageDecodeError("data URL is not base64 encoded".into()))?;
        let mime = ImageMime::from_media_type(media_type)
            .ok_or_else(|| Error::UnsupportedImageType(media_type.to_string()))?;
        BASE64
            .decode(payload)
            .map_err(|e| Error::ImageDecodeError(format!("invalid base64 payload: {}", e)))?;
        Ok(Self {
            mime,
            data_url: format!("data:{};base64,{}", mime.as_str(), payload),
        })
    }

    /// Read and encode an image file
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Size of the decoded image in bytes
    pub fn byte_len(&self) -> usize {
        let payload = self.data_url.rsplit(',').next().unwrap_or_default();
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
        (payload.len() / 4) * 3 - padding
    }
}

/// Outcome of one background decode
#[derive(Debug)]
pub struct DecodeCompletion {
    pub id: IngredientId,
    pub result: Result<NutritionImage>,
}

enum Source {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Decodes nutrition images off the host thread
///
/// Each request runs on its own worker thread. Completions are collected
/// with [`try_completed`](Self::try_completed) or
/// [`wait_all`](Self::wait_all). There is no cancellation: if the ingredient
/// is removed before its decode finishes, the completion is still delivered
/// and the store simply ignores it.
pub struct ImageLoader {
    done_tx: Sender<DecodeCompletion>,
    done_rx: Receiver<DecodeCompletion>,
    pending: Cell<usize>,
}

impl ImageLoader {
    pub fn new() -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            done_tx,
            done_rx,
            pending: Cell::new(0),
        }
    }

    /// Start decoding the file at `path` for ingredient `id`
    pub fn request(&self, id: IngredientId, path: impl Into<PathBuf>) {
        self.spawn(id, Source::File(path.into()));
    }

    /// Start encoding bytes already read by the host
    pub fn request_bytes(&self, id: IngredientId, bytes: Vec<u8>) {
        self.spawn(id, Source::Bytes(bytes));
    }

    fn spawn(&self, id: IngredientId, source: Source) {
        let tx = self.done_tx.clone();
        self.pending.set(self.pending.get() + 1);
        thread::spawn(move || {
            let result = match source {
                Source::File(path) => NutritionImage::from_path(&path),
                Source::Bytes(bytes) => NutritionImage::from_bytes(&bytes),
            };
            // The loader may have been dropped; nothing left to notify.
            let _ = tx.send(DecodeCompletion { id, result });
        });
    }

    /// Number of requests whose completion has not been collected yet
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    /// Collect every completion that is ready without blocking
    pub fn try_completed(&self) -> Vec<DecodeCompletion> {
        let mut done = Vec::new();
        while let Ok(c) = self.done_rx.try_recv() {
            self.pending.set(self.pending.get().saturating_sub(1));
            done.push(c);
        }
        done
    }

    /// Block until every pending request has completed or `timeout` elapses
    pub fn wait_all(&self, timeout: Duration) -> Vec<DecodeCompletion> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while self.pending.get() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.done_rx.recv_timeout(remaining) {
                Ok(c) => {
                    self.pending.set(self.pending.get() - 1);
                    done.push(c);
                }
                Err(_) => break,
            }
        }
        done
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}
