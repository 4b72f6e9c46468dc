use super::error::VideoError;
use image::{ImageOutputFormat, RgbImage};
use std::io::Cursor;

/// 解码后的一帧（RGB24 紧密排列）
#[derive(Debug, Clone)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub frame_number: u64,
}

impl RgbFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, frame_number: u64) -> Self {
        Self {
            width,
            height,
            data,
            frame_number,
        }
    }

    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// 压缩为 JPEG 字节
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>, VideoError> {
        let img = RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            VideoError::InvalidFrame {
                width: self.width,
                height: self.height,
            },
        )?;

        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality))?;
        Ok(buffer.into_inner())
    }
}

/// 帧文件名：frame_0000.jpg 起，四位补零
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:04}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = RgbFrame::new(4, 2, vec![0u8; RgbFrame::byte_len(4, 2)], 7);
        assert_eq!(frame.data.len(), 24);
        assert_eq!(frame.frame_number, 7);
    }

    #[test]
    fn test_jpeg_encoding_has_soi_marker() {
        let frame = RgbFrame::new(16, 16, vec![200u8; RgbFrame::byte_len(16, 16)], 0);
        let jpeg = frame.to_jpeg(90).unwrap();
        assert!(jpeg.len() > 4);
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_jpeg_rejects_short_buffer() {
        let frame = RgbFrame::new(16, 16, vec![0u8; 10], 0);
        assert!(matches!(
            frame.to_jpeg(90),
            Err(VideoError::InvalidFrame { width: 16, height: 16 })
        ));
    }

    #[test]
    fn test_frame_file_name_padding() {
        assert_eq!(frame_file_name(0), "frame_0000.jpg");
        assert_eq!(frame_file_name(42), "frame_0042.jpg");
        assert_eq!(frame_file_name(12345), "frame_12345.jpg");
    }
}
