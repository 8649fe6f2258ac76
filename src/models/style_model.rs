use bytes::Bytes;

#[derive(Clone)]
pub struct GenerateStyleInput {
    pub im_bytes: Bytes,
    pub prompt: String,
}
