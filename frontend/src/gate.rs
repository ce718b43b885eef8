//! 请求闸门
//!
//! 视图按"键"发起请求（如 `(文档 id, 令牌)`）：同一个键只请求一次，
//! 响应到达时如果键已不是最新的，结果直接丢弃，避免旧响应覆盖新状态。

#[derive(Debug, Clone, PartialEq)]
pub struct RequestGate<K> {
    current: Option<K>,
}

impl<K> Default for RequestGate<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: Clone + PartialEq> RequestGate<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录新观察到的键
    ///
    /// 返回 `true` 表示键发生变化，调用方应当发起请求。
    pub fn observe(&mut self, key: K) -> bool {
        if self.current.as_ref() == Some(&key) {
            return false;
        }
        self.current = Some(key);
        true
    }

    /// 响应到达时判断是否仍应应用
    pub fn is_current(&self, key: &K) -> bool {
        self.current.as_ref() == Some(key)
    }
}
