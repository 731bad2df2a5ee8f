//! IdGenerator port - 一時 ID 生成の抽象化
//!
//! ローカル作成直後のタスクにはミリ秒タイムスタンプを一時 ID として振る。
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **MillisIdGenerator**: Clock ベース（同一ミリ秒でも単調増加）

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::TaskId;
use crate::ports::Clock;

/// IdGenerator は TaskStore 内で一意な一時 ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数タスクから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_temp_id(&self) -> TaskId;
}

/// MillisIdGenerator は現在時刻（ms）ベースの一時 ID 生成器
///
/// 同じミリ秒に複数回呼ばれた場合（FixedClock を含む）は前回 +1 を返すので、
/// 1 つの generator から出る ID は常に狭義単調増加。
pub struct MillisIdGenerator<C> {
    clock: C,
    last: AtomicU64,
}

impl<C: Clock> MillisIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }
}

impl<C: Clock> IdGenerator for MillisIdGenerator<C> {
    fn generate_temp_id(&self) -> TaskId {
        let now = self.clock.now().timestamp_millis().max(0) as u64;
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return TaskId::Temp(next),
                Err(actual) => prev = actual,
            }
        }
    }
}
