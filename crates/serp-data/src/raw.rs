//! 형식이 정해지지 않은 원시 행.
//!
//! 같은 CSV에서 읽은 행들은 하나의 [`Header`]를 공유하므로, 컬럼 조회는
//! 헤더의 위치 맵으로 한 번에 끝나고 셀은 인덱스로 바로 읽습니다.

use std::collections::HashMap;
use std::sync::Arc;

/// 컬럼 이름 목록과 이름 → 위치 맵.
///
/// 이름이 중복되면 조회는 첫 번째 컬럼을 가리킵니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut header = Self::default();
        for name in names {
            header.push(name.into());
        }
        header
    }

    /// 컬럼을 끝에 추가하고 그 인덱스를 반환합니다.
    pub fn push(&mut self, name: String) -> usize {
        let index = self.names.len();
        self.positions.entry(name.clone()).or_insert(index);
        self.names.push(name);
        index
    }

    /// 없는 컬럼만 추가합니다.
    pub fn push_unique(&mut self, name: &str) {
        if !self.positions.contains_key(name) {
            self.push(name.to_string());
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// 컬럼 이름 → 값 매핑 한 행.
///
/// 컬럼 순서를 보존하며, 값은 CSV에서 읽은 문자열 그대로입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1부터 시작하는 데이터 행 번호
    pub index: usize,
    header: Arc<Header>,
    values: Vec<String>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            header: Arc::default(),
            values: Vec::new(),
        }
    }

    /// 공유 헤더로 행을 만듭니다. 값이 모자라면 빈 셀로 채우고 남으면 버립니다.
    pub fn with_header(index: usize, header: Arc<Header>, mut values: Vec<String>) -> Self {
        values.resize(header.len(), String::new());
        Self {
            index,
            header,
            values,
        }
    }

    /// `(컬럼, 값)` 쌍으로부터 행을 만듭니다.
    pub fn from_pairs<K, V, I>(index: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new(index);
        for (column, value) in pairs {
            row.insert(column, value);
        }
        row
    }

    /// 셀을 설정합니다. 이미 있는 컬럼이면 값을 덮어씁니다.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        match self.header.position(&column) {
            Some(i) => self.values[i] = value.into(),
            None => {
                Arc::make_mut(&mut self.header).push(column);
                self.values.push(value.into());
            }
        }
    }

    /// 공백을 제거한 값. 컬럼이 없거나 값이 비어 있으면 `None`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header.position(column).and_then(|i| self.value_at(i))
    }

    /// 헤더 위치로 값을 읽습니다. [`get`](Self::get)과 같은 규칙으로 공백/빈 값을 처리합니다.
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values
            .get(index)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.header.names().iter().map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.header.contains(column)
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    pub fn len(&self) -> usize {
        self.header.len()
    }
}
