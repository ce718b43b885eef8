//! 定时器封装模块
//!
//! 使用 `web_sys` 的原生定时器 API 替代 `gloo-timers`。

use wasm_bindgen::prelude::*;

/// `setTimeout` 接受的延迟，超出 `i32` 范围时取最大值
fn timeout_delay(millis: u32) -> i32 {
    i32::try_from(millis).unwrap_or(i32::MAX)
}

/// 一次性定时器
///
/// 封装 `setTimeout` API。当 `Timeout` 被 drop 时，未触发的回调会被取消；
/// 需要脱离作用域继续等待时调用 [`Timeout::forget`]。
pub struct Timeout {
    handle: Option<i32>,
    closure: Option<Closure<dyn FnMut()>>,
}

impl Timeout {
    /// 创建新的一次性定时器
    ///
    /// # 参数
    /// - `millis`: 延迟时间（毫秒）
    /// - `callback`: 到期时执行的回调
    ///
    /// 无法获取 window 或设置失败时回调不会执行，并记录一条警告。
    pub fn new<F>(millis: u32, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(callback) = callback.take() {
                callback();
            }
        });

        let handle = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    timeout_delay(millis),
                )
                .ok()
        });
        if handle.is_none() {
            log::warn!("[Timer] setTimeout unavailable, callback dropped");
        }

        Self {
            handle,
            closure: Some(closure),
        }
    }

    /// 取消定时器
    pub fn cancel(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }

    /// 让定时器在当前作用域结束后继续生效
    pub fn forget(mut self) {
        self.handle = None;
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_passes_small_values_through() {
        assert_eq!(timeout_delay(2000), 2000);
    }

    #[test]
    fn test_delay_saturates_instead_of_wrapping() {
        assert_eq!(timeout_delay(u32::MAX), i32::MAX);
        assert_eq!(timeout_delay(i32::MAX as u32 + 1), i32::MAX);
    }
}
