//! TTL 기반 인메모리 캐시.
//!
//! 키별로 저장 시각을 기록하고, 조회 시점에 호출자가 전달한 TTL로
//! 신선도를 판정합니다.
//!
//! # 만료 정책
//!
//! - 최대 크기 제한이나 LRU/LFU 제거는 없습니다. TTL만이 제거 기준입니다.
//! - 제거는 지연(lazy) 방식입니다: 만료된 항목은 같은 키를 다시 조회할 때만
//!   삭제됩니다. 다시 조회되지 않는 키는 TTL이 지나도 메모리에 남습니다.
//! - [`TtlCache::sweep_expired`]는 이 동작을 바꾸지 않는 선택적 정리 수단입니다.
//!
//! # 동시성
//!
//! 내부 저장소는 샤딩된 `DashMap`입니다. 키 단위의 조회/만료 판정/삭제와
//! 쓰기는 원자적이며, 여러 키에 걸친 트랜잭션은 제공하지 않습니다.
//! 모든 메서드는 동기 함수이므로 await 지점에서 락을 잡고 있는 일이 없습니다.

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// 캐시 항목.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// 저장된 값
    pub value: V,
    /// 저장 시각
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    /// 기준 시각에서의 항목 나이.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    /// `now - stored_at < ttl`이면 신선한 항목.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

/// 문자열 키 기반 TTL 캐시.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// 빈 캐시 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시 조회.
    ///
    /// - 항목이 있고 `ttl` 이내 → 값 반환 (히트)
    /// - 항목이 있지만 만료 → 삭제 후 `None` (미스 + 지연 제거)
    /// - 항목 없음 → `None` (미스)
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh(now, ttl) {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        // 판정과 삭제 사이에 새로 기록된 항목은 지우지 않도록 조건부 삭제
        if self
            .entries
            .remove_if(key, |_, entry| !entry.is_fresh(now, ttl))
            .is_some()
        {
            trace!(key, "Expired cache entry evicted on lookup");
        }
        None
    }

    /// 값 저장 (기존 항목은 무조건 덮어씀, `stored_at = now`).
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), CacheEntry::new(value));
    }

    /// 만료 여부와 무관하게 키가 저장되어 있는지 확인합니다.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 모든 항목 삭제. 삭제된 항목 수를 반환합니다.
    ///
    /// 호출 시점에 존재하던 항목은 반환 후 남아 있지 않습니다.
    /// 동시에 기록된 항목의 생존 여부는 보장하지 않습니다.
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, _| {
            removed += 1;
            false
        });
        removed
    }

    /// `ttl`이 지난 항목을 일괄 삭제하고 삭제 수를 반환합니다.
    pub fn sweep_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = entry.is_fresh(now, ttl);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// 저장된 항목 수 (만료되었지만 아직 제거되지 않은 항목 포함).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 캐시가 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
