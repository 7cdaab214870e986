//! WorkerSelector port - picks the queue a submitted task goes to.

/// Chooses one index in `0..len`.
///
/// 乱数源を差し替え可能にするための trait。テストでは seed 固定や
/// ラウンドロビンの実装を渡して、振り分けを決定的にする。
///
///
/// Controllers with more than one queue call this once per accepted
/// submission. `len` is never zero.
pub trait WorkerSelector: Send {
    fn select(&mut self, len: usize) -> usize;
}
