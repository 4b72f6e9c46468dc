//! 远端模型边界
//!
//! 各阶段只依赖 `ModelClient`：生产环境用 `ChatCompletionsClient`，
//! 测试用 `CannedModel` 返回固定文本。

pub mod client;
pub mod error;
pub mod prompts;
pub mod wire;

pub use client::ChatCompletionsClient;
pub use error::ModelError;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

pub trait ModelClient {
    /// 视觉调用：固定指令 + 一张或多张图片
    fn describe_images(&self, prompt: &str, images: &[EncodedImage]) -> Result<String, ModelError>;

    /// 文本调用：指令 + 拼接好的正文
    fn synthesize_text(&self, prompt: &str, text: &str) -> Result<String, ModelError>;
}

/// base64 编码后的 JPEG，准备放进请求体
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub name: String,
    pub base64: String,
}

impl EncodedImage {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            base64: BASE64_STANDARD.encode(bytes),
        }
    }

    pub fn from_jpeg_file(path: &Path) -> Result<Self, ModelError> {
        let bytes = fs::read(path).map_err(|source| ModelError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_bytes(name, &bytes))
    }

    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.base64)
    }
}

/// 一次模型调用的记录
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Describe { prompt: String, images: Vec<String> },
    Synthesize { prompt: String, text: String },
}

/// 固定响应的模型替身，记录所有调用
pub struct CannedModel {
    describe_response: String,
    synthesize_response: String,
    fail_describe_on: Vec<usize>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl CannedModel {
    pub fn new(describe_response: &str, synthesize_response: &str) -> Self {
        Self {
            describe_response: describe_response.to_string(),
            synthesize_response: synthesize_response.to_string(),
            fail_describe_on: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 第 n 次（从 0 计）视觉调用返回错误
    pub fn failing_describe_on(mut self, call_indices: Vec<usize>) -> Self {
        self.fail_describe_on = call_indices;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn describe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Describe { .. }))
            .count()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

/// 总是失败的模型，用于验证失败路径不写文件
pub struct FailingModel;

impl ModelClient for FailingModel {
    fn describe_images(&self, _prompt: &str, _images: &[EncodedImage]) -> Result<String, ModelError> {
        Err(ModelError::EmptyResponse)
    }

    fn synthesize_text(&self, _prompt: &str, _text: &str) -> Result<String, ModelError> {
        Err(ModelError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

impl ModelClient for CannedModel {
    fn describe_images(&self, prompt: &str, images: &[EncodedImage]) -> Result<String, ModelError> {
        let index = self.describe_count();
        self.record(RecordedCall::Describe {
            prompt: prompt.to_string(),
            images: images.iter().map(|i| i.name.clone()).collect(),
        });
        if self.fail_describe_on.contains(&index) {
            return Err(ModelError::Status {
                status: 500,
                body: format!("canned failure #{index}"),
            });
        }
        Ok(self.describe_response.clone())
    }

    fn synthesize_text(&self, prompt: &str, text: &str) -> Result<String, ModelError> {
        self.record(RecordedCall::Synthesize {
            prompt: prompt.to_string(),
            text: text.to_string(),
        });
        Ok(self.synthesize_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_image_data_url() {
        let img = EncodedImage::from_bytes("frame_0000.jpg", b"\xFF\xD8\xFF");
        assert_eq!(img.base64, "/9j/");
        assert_eq!(img.data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_encoded_image_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EncodedImage::from_jpeg_file(&dir.path().join("gone.jpg"));
        assert!(matches!(result, Err(ModelError::ImageRead { .. })));
    }

    #[test]
    fn test_canned_model_records_and_fails_on_request() {
        let model = CannedModel::new("desc", "story").failing_describe_on(vec![1]);
        let img = EncodedImage::from_bytes("a.jpg", b"x");

        assert_eq!(model.describe_images("p", &[img.clone()]).unwrap(), "desc");
        assert!(model.describe_images("p", &[img.clone()]).is_err());
        assert_eq!(model.describe_images("p", &[img]).unwrap(), "desc");
        assert_eq!(model.synthesize_text("s", "body").unwrap(), "story");

        let calls = model.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[3],
            RecordedCall::Synthesize {
                prompt: "s".to_string(),
                text: "body".to_string()
            }
        );
    }
}
