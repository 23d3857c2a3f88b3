/// 固定容量环形缓冲区
///
/// 保存最近的采样（帧时间、帧率），满了以后丢弃最旧的元素。

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// 创建指定容量的缓冲区，容量至少为1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 添加元素，已满时移除最旧的元素
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// 最新的元素
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }

    /// 最旧的元素
    pub fn first(&self) -> Option<&T> {
        self.buffer.front()
    }
}

impl<T> RingBuffer<T>
where
    T: Copy + Into<f32>,
{
    /// 平均值，空缓冲区返回0
    pub fn average(&self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.buffer.iter().map(|&x| x.into()).sum();
        sum / self.buffer.len() as f32
    }

    pub fn min(&self) -> Option<f32> {
        self.buffer.iter().map(|&x| x.into()).min_by(f32::total_cmp)
    }

    pub fn max(&self) -> Option<f32> {
        self.buffer.iter().map(|&x| x.into()).max_by(f32::total_cmp)
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new(120)
    }
}
