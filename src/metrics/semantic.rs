//! 语义相似度
//!
//! 句向量模型通过 [`Embedder`] 抽象接入。默认实现是基于特征哈希的
//! [`HashingEmbedder`]：词元、词元二元组和字符三元组被散列到固定维度的向量上，
//! 不依赖外部模型文件。进程内只构造一次，通过 [`shared_embedder`] 共享。

use std::sync::{Arc, OnceLock};

use xxhash_rust::xxh64::xxh64;

use crate::error::AppResult;
use crate::text::normalize;

/// 文本向量化
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> AppResult<Vec<f32>>;

    fn name(&self) -> &str;
}

const TOKEN_SEED: u64 = 0;
const BIGRAM_SEED: u64 = 1;
const TRIGRAM_SEED: u64 = 2;

/// 特征哈希向量化
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSIONS: usize = 384;

    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, seed: u64, weight: f32) {
        let hash = xxh64(feature.as_bytes(), seed);
        let bucket = (hash % self.dimensions as u64) as usize;
        // 用最高位决定符号，降低碰撞带来的系统性偏差
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        let tokens = normalize(text);

        for token in &tokens {
            self.add_feature(&mut vector, token, TOKEN_SEED, 1.0);

            let padded: Vec<char> = format!("<{token}>").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, &trigram, TRIGRAM_SEED, 0.5);
            }
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut vector, &bigram, BIGRAM_SEED, 0.75);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(vector)
    }

    fn name(&self) -> &str {
        "hashing-embedder"
    }
}

static SHARED_EMBEDDER: OnceLock<Arc<dyn Embedder>> = OnceLock::new();

/// 进程级共享的默认向量化器
pub fn shared_embedder() -> Arc<dyn Embedder> {
    SHARED_EMBEDDER
        .get_or_init(|| Arc::new(HashingEmbedder::default()))
        .clone()
}

/// 余弦相似度；任一向量为零向量时为 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// 两段文本向量的余弦相似度，负值截断为 0
pub fn semantic_similarity(
    embedder: &dyn Embedder,
    reference: &str,
    candidate: &str,
) -> AppResult<f64> {
    let reference_vector = embedder.embed(reference)?;
    let candidate_vector = embedder.embed(candidate)?;
    Ok(cosine_similarity(&reference_vector, &candidate_vector).clamp(0.0, 1.0))
}
