//! タスク間共有状態
//!
//! クリティカルセクションで保護した`Cell`により、構造体全体を一括で読み書きします。
//! 制御タスクは1周期に1回スナップショットを取得するため、複数フィールドの不整合（torn read）は発生しません。

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// 一括読み書きされる共有値
pub struct Shared<T> {
    inner: Mutex<CriticalSectionRawMutex, Cell<T>>,
}

impl<T: Copy> Shared<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(value)),
        }
    }

    /// スナップショットを取得
    pub fn get(&self) -> T {
        self.inner.lock(|cell| cell.get())
    }

    /// 値全体を置き換え
    pub fn set(&self, value: T) {
        self.inner.lock(|cell| cell.set(value));
    }

    /// 読み出し・変更・書き戻しを1つのクリティカルセクションで実行
    ///
    /// # 戻り値
    /// 変更後の値と、クロージャの戻り値
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> (T, R) {
        self.inner.lock(|cell| {
            let mut value = cell.get();
            let result = f(&mut value);
            cell.set(value);
            (value, result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::mode::OperatingMode;
    use crate::setpoints::{Adjustments, Setpoints};

    #[test]
    fn test_get_set() {
        let shared = Shared::new(3u32);
        assert_eq!(shared.get(), 3);
        shared.set(7);
        assert_eq!(shared.get(), 7);
    }

    #[test]
    fn test_update_applies_command_atomically() {
        static SETPOINTS: Shared<Setpoints> = Shared::new(Setpoints::DEFAULT);
        let adjustments = Adjustments::default();

        let (after, changed) = SETPOINTS.update(|sp| sp.apply(Command::Power, &adjustments));

        assert!(changed);
        assert_eq!(after.mode, OperatingMode::Power);
        assert_eq!(SETPOINTS.get(), after);
    }

    #[test]
    fn test_concurrent_writers_never_tear() {
        use std::thread;

        static PAIR: Shared<(u32, u32)> = Shared::new((0, 0));

        let writer = thread::spawn(|| {
            for i in 1..=10_000u32 {
                PAIR.set((i, i));
            }
        });
        for _ in 0..10_000 {
            let (a, b) = PAIR.get();
            assert_eq!(a, b);
        }
        writer.join().unwrap();
        assert_eq!(PAIR.get(), (10_000, 10_000));
    }
}
