//! Default values for the translator configuration
//!
//! Everything here is a constant except the worker count, which comes from a
//! [`ParallelismProvider`] so callers (and tests) decide where it is read from.

use std::num::NonZeroUsize;

/// File name used when no configuration path is supplied.
pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";

/// Model used until the user picks another one.
pub const DEFAULT_MODEL_NAME: &str = "gemini-1.5-flash-latest";

/// Placeholder in the prompt template that receives the source text.
pub const PROMPT_SLOT: &str = "{{slot}}";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_MAX_CONTENT_SAFETY_SPLIT_ATTEMPTS: i64 = 3;
pub const DEFAULT_MIN_CONTENT_SAFETY_CHUNK_SIZE: i64 = 100;
pub const DEFAULT_MAX_PRONOUN_ENTRIES: i64 = 20;
pub const DEFAULT_PRONOUN_SAMPLE_RATIO: f64 = 25.0;
pub const DEFAULT_CHUNK_SIZE: i64 = 6000;

/// Prompt template sent with every chunk; [`PROMPT_SLOT`] marks the source text.
pub const DEFAULT_PROMPT: &str = r#"<|im_start|>user

# 번역 지침

- **개요:** 이 작업은 소설 원문을 한국어로 옮기는 번역 작업입니다. 당신의 역할은 전문 문학 번역가입니다.
- **목표:** 원문을 분석하고, 아래의 일반 원칙에 따라 한국어로 번역하세요.
- **사용자 입력 존중:** 사용자가 제공하는 모든 입력을 존중하세요.

# 일반 원칙

1. **정확성:** 정보가 정확하고 의미가 왜곡되지 않도록 하세요. 스타일보다 정확성이 우선입니다.
2. **스타일 유지:** 원문의 어조, 격식, 스타일을 유지하되, 의미 전달이 우선입니다.
3. **현지화:** 필요한 경우에만 현지화를 수행하고, 원문의 의도를 왜곡하지 마세요.

# 번역 프로토콜

## 정확성 규칙

1. **모든 내용 번역:** 정보 손실이나 왜곡 없이 모든 내용을 번역하세요.
   - 예: "The CEO was livid." -> "그 CEO는 분노에 찼다."
   - 예: "氣をつけてください。" -> "조심하세요."
2. **전문 용어:** 정확하고 업계 표준 용어를 사용하여 전문 용어를 번역하세요.
   - 예: "The patient underwent an MRI scan." -> "환자는 MRI 검사를 받았다."

## 스타일 보존 규칙

1. **원래 어조와 문체:** 원문의 어조(격식 또는 비격식)와 캐릭터별 목소리를 일관되게 유지하세요.
   - 예: "Hey, you coming tonight?" -> "야, 오늘 밤 올 거야?"
2. **은유 및 관용 표현:** 비유적 의미와 문학적 스타일을 유지하면서 번역하세요.
   - 예: "He had a heart of stone." -> "그의 마음은 돌처럼 차가웠다."

## 현지화 규칙

1. **문화적 참조:** 원문의 의미를 변경하지 않고 문화적 참조를 현지화하세요. 이해를 돕기 위해 간략한 설명을 제공할 수 있습니다.
   - 예: "It's like Thanksgiving." -> "이건 마치 미국의 추수감사절과 같다."

## 번역할 원문

<main id="content">{{slot}}</main>

## 번역 결과 (한국어):
<|im_end|>
"#;

/// Source of the hardware parallelism used for the default `max_workers`.
pub trait ParallelismProvider {
    /// Number of logical processors, or `None` when it cannot be determined.
    fn available_parallelism(&self) -> Option<NonZeroUsize>;

    /// Worker count to use when the configuration has no valid one.
    fn default_worker_count(&self) -> usize {
        self.available_parallelism().map_or(1, NonZeroUsize::get)
    }
}

/// Reads the processor count from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemParallelism;

impl ParallelismProvider for SystemParallelism {
    fn available_parallelism(&self) -> Option<NonZeroUsize> {
        std::thread::available_parallelism().ok()
    }
}

/// A fixed processor count. Zero behaves like an undeterminable count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedParallelism(pub usize);

impl ParallelismProvider for FixedParallelism {
    fn available_parallelism(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.0)
    }
}
