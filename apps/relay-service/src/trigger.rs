//! # ドキュメントトリガー
//!
//! ドキュメントパターンとハンドラの対応表を保持し、受信したドキュメント作成イベントを
//! パターンに一致するハンドラへ振り分ける。
//!
//! ## 設計方針
//!
//! - ハンドラは戻り値を持たない（失敗の扱いはハンドラ内で完結させる）
//! - 1 つのイベントが複数パターンに一致した場合、登録順にすべてのハンドラを呼ぶ

use std::sync::Arc;

use async_trait::async_trait;
use mailrelay_domain::document::{DocumentCreated, DocumentPattern};

/// ドキュメント作成イベントのハンドラ
#[async_trait]
pub trait DocumentCreatedHandler: Send + Sync {
    /// `event.params` にはトリガーパターンで捕捉したパラメータが設定される
    async fn on_document_created(&self, event: &DocumentCreated);
}

struct Trigger {
    pattern: DocumentPattern,
    handler: Arc<dyn DocumentCreatedHandler>,
}

/// トリガー登録表
#[derive(Default)]
pub struct TriggerRegistry {
    triggers: Vec<Trigger>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// パターンにハンドラを登録する
    pub fn register(
        &mut self,
        pattern: DocumentPattern,
        handler: Arc<dyn DocumentCreatedHandler>,
    ) -> &mut Self {
        tracing::info!(%pattern, "ドキュメントトリガーを登録しました");
        self.triggers.push(Trigger { pattern, handler });
        self
    }

    /// 一致するすべてのハンドラにイベントを渡し、呼び出したハンドラ数を返す
    pub async fn dispatch(&self, event: &DocumentCreated) -> usize {
        let mut invoked = 0;

        for trigger in &self.triggers {
            let Some(params) = trigger.pattern.matches(&event.path) else {
                continue;
            };
            let matched = event.clone().with_params(params);
            trigger.handler.on_document_created(&matched).await;
            invoked += 1;
        }

        if invoked == 0 {
            tracing::debug!(
                path = %event.path,
                collection = event.path.collection_id(),
                event_id = %event.event_id,
                "一致するトリガーがないためイベントを無視します"
            );
        }

        invoked
    }
}
