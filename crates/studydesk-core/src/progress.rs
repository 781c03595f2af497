// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decoding of the material progress stream.
//!
//! While the backend distills a material it reports each step as a
//! server-sent event whose `data` field is a JSON object. The decoder is fed
//! the raw bytes as they arrive, in chunks of arbitrary size.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::Id;

wire_enum! {
    /// The stages the backend goes through while processing a material.
    pub enum ProgressStep {
        Extracting => "extracting",
        Extracted => "extracted",
        Generating => "generating",
        Generated => "generated",
        Saving => "saving",
        Completed => "completed",
        Error => "error",
    }
}

impl ProgressStep {
    /// Whether no further events follow this one.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProgressStep::Completed | ProgressStep::Error)
    }
}

/// One progress report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: ProgressStep,
    /// Percentage, from 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub material_id: Option<Id>,
    /// Step-specific payload: the key points after extraction, the number of
    /// questions after generation.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Incremental decoder for a `text/event-stream` body.
#[derive(Default)]
pub struct ProgressDecoder {
    /// Bytes received after the last complete line.
    pending: Vec<u8>,
    /// `data` lines of the event being read.
    data: Vec<String>,
}

impl ProgressDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the stream, returning every event it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Fallible<Vec<ProgressEvent>> {
        self.pending.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line: String = String::from_utf8(line)?;
            if let Some(event) = self.read_line(&line)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Signal the end of the stream. An event that was not followed by a
    /// blank line is still delivered.
    pub fn finish(mut self) -> Fallible<Option<ProgressEvent>> {
        if !self.pending.is_empty() {
            let mut line: Vec<u8> = std::mem::take(&mut self.pending);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line: String = String::from_utf8(line)?;
            if let Some(event) = self.read_line(&line)? {
                return Ok(Some(event));
            }
        }
        self.dispatch()
    }

    fn read_line(&mut self, line: &str) -> Fallible<Option<ProgressEvent>> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return Ok(None);
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        Ok(None)
    }

    fn dispatch(&mut self) -> Fallible<Option<ProgressEvent>> {
        if self.data.is_empty() {
            return Ok(None);
        }
        let payload: String = self.data.join("\n");
        self.data.clear();
        let event: ProgressEvent = serde_json::from_str(&payload).map_err(|e| {
            ErrorReport::new(format!("Malformed progress event '{payload}': {e}"))
        })?;
        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = concat!(
        "data: {\"step\": \"extracting\", \"progress\": 10, \"message\": \"Extracting key points...\"}\n\n",
        "data: {\"step\": \"generated\", \"progress\": 70, \"message\": \"Generated 5 questions\", \"data\": 5}\n\n",
        "data: {\"step\": \"completed\", \"progress\": 100, \"message\": \"Done\", \"material_id\": 9}\n\n",
    );

    #[test]
    fn test_whole_stream() -> Fallible<()> {
        let mut decoder = ProgressDecoder::new();
        let events = decoder.push(STREAM.as_bytes())?;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].step, ProgressStep::Extracting);
        assert_eq!(events[1].data, Some(serde_json::json!(5)));
        assert_eq!(events[2].material_id, Some(9));
        assert!(events[2].step.is_terminal());
        assert_eq!(decoder.finish()?, None);
        Ok(())
    }

    #[test]
    fn test_byte_by_byte() -> Fallible<()> {
        let mut decoder = ProgressDecoder::new();
        let mut events = Vec::new();
        for byte in STREAM.as_bytes() {
            events.extend(decoder.push(&[*byte])?);
        }
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].progress, 70);
        Ok(())
    }

    #[test]
    fn test_split_multibyte_character() -> Fallible<()> {
        let stream = "data: {\"step\": \"saving\", \"progress\": 85, \"message\": \"保存题目 1/5\"}\n\n";
        let bytes = stream.as_bytes();
        let split = stream.find('保').unwrap() + 1;
        let mut decoder = ProgressDecoder::new();
        assert!(decoder.push(&bytes[..split])?.is_empty());
        let events = decoder.push(&bytes[split..])?;
        assert_eq!(events[0].message, "保存题目 1/5");
        Ok(())
    }

    #[test]
    fn test_crlf_comments_and_multiline_data() -> Fallible<()> {
        let stream = ": keep-alive\r\nevent: progress\r\ndata: {\"step\": \"error\",\r\ndata: \"progress\": 0, \"message\": \"boom\"}\r\n\r\n";
        let mut decoder = ProgressDecoder::new();
        let events = decoder.push(stream.as_bytes())?;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, ProgressStep::Error);
        assert_eq!(events[0].message, "boom");
        Ok(())
    }

    #[test]
    fn test_finish_flushes_unterminated_event() -> Fallible<()> {
        let mut decoder = ProgressDecoder::new();
        let stream = "data: {\"step\": \"completed\", \"progress\": 100, \"message\": \"Done\"}";
        assert!(decoder.push(stream.as_bytes())?.is_empty());
        let event = decoder.finish()?;
        assert_eq!(event.map(|e| e.step), Some(ProgressStep::Completed));
        Ok(())
    }

    #[test]
    fn test_malformed_event() {
        let mut decoder = ProgressDecoder::new();
        let result = decoder.push(b"data: {not json}\n\n");
        assert!(result.is_err());
    }
}
