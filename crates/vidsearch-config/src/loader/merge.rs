//! Configuration merging logic
//!
//! Merges configurations from multiple sources with proper precedence.

use crate::{types::*, Config};

/// Merge two configurations, with `overlay` taking precedence
///
/// A field from `overlay` wins only when it differs from the default, so a
/// partial file or env overlay never resets values set by an earlier source.
pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.core = merge_core(base.core, overlay.core);
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.punctuation = merge_punctuation(base.punctuation, overlay.punctuation);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.search = merge_search(base.search, overlay.search);
    base.youtube = merge_youtube(base.youtube, overlay.youtube);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn pick_opt<T>(base: Option<T>, overlay: Option<T>) -> Option<T> {
    overlay.or(base)
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        data_dir: pick(base.data_dir, overlay.data_dir, default.data_dir),
        videos_file: pick(base.videos_file, overlay.videos_file, default.videos_file),
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        tokens_per_chunk: pick(
            base.tokens_per_chunk,
            overlay.tokens_per_chunk,
            default.tokens_per_chunk,
        ),
        separator: pick(base.separator, overlay.separator, default.separator),
        abbreviations: pick(
            base.abbreviations,
            overlay.abbreviations,
            default.abbreviations,
        ),
    }
}

fn merge_punctuation(base: PunctuationConfig, overlay: PunctuationConfig) -> PunctuationConfig {
    let default = PunctuationConfig::default();
    PunctuationConfig {
        model: pick(base.model, overlay.model, default.model),
        endpoint: pick_opt(base.endpoint, overlay.endpoint),
        api_key_env: pick(base.api_key_env, overlay.api_key_env, default.api_key_env),
        tokenizer_path: pick_opt(base.tokenizer_path, overlay.tokenizer_path),
        max_length: pick(base.max_length, overlay.max_length, default.max_length),
        reserved_tokens: pick(base.reserved_tokens, overlay.reserved_tokens, default.reserved_tokens),
        parallel: pick(base.parallel, overlay.parallel, default.parallel),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        backend: pick(base.backend, overlay.backend, default.backend),
        model_name: pick(base.model_name, overlay.model_name, default.model_name),
        tokenizer_path: pick_opt(base.tokenizer_path, overlay.tokenizer_path),
        max_length: pick(base.max_length, overlay.max_length, default.max_length),
        batch_size: pick(base.batch_size, overlay.batch_size, default.batch_size),
    }
}

fn merge_search(base: SearchConfig, overlay: SearchConfig) -> SearchConfig {
    let default = SearchConfig::default();
    SearchConfig {
        top_k: pick(base.top_k, overlay.top_k, default.top_k),
    }
}

fn merge_youtube(base: YoutubeConfig, overlay: YoutubeConfig) -> YoutubeConfig {
    let default = YoutubeConfig::default();
    YoutubeConfig {
        languages: pick(base.languages, overlay.languages, default.languages),
        cache: pick(base.cache, overlay.cache, default.cache),
    }
}
