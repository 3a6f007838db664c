//! 頁面狀態快照與 reducer。reducer 不碰文件，只回傳新快照與要套用的 patch。

use crate::core::dom::{DomPatch, NodeTarget, LOADING_PLACEHOLDER};
use crate::core::renderer::TAGLINE_ID;
use crate::domain::model::{GeneratedContent, Service};

pub const FALLBACK_TAGLINE: &str = "Error loading content. Please try again later.";
pub const DESCRIPTION_FAILURE: &str = "Could not load description.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Loading,
    Ready(String),
    Failed(String),
}

impl SlotState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SlotState::Loading)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SlotState::Loading => None,
            SlotState::Ready(text) | SlotState::Failed(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSnapshot {
    pub title: String,
    pub description: SlotState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub tagline: SlotState,
    pub cards: Vec<CardSnapshot>,
}

impl PageSnapshot {
    /// 初次渲染後的狀態：全部都還在 loading
    pub fn loading(services: &[Service]) -> Self {
        Self {
            tagline: SlotState::Loading,
            cards: services
                .iter()
                .map(|service| CardSnapshot {
                    title: service.title.to_string(),
                    description: SlotState::Loading,
                })
                .collect(),
        }
    }

    pub fn card(&self, title: &str) -> Option<&CardSnapshot> {
        self.cards.iter().find(|card| card.title == title)
    }

    pub fn pending_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.description.is_loading())
            .count()
    }
}

#[derive(Debug, Clone)]
pub enum PageEvent {
    ContentGenerated(GeneratedContent),
    GenerationFailed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PopulateOptions {
    /// 沒有對應描述的卡片改用失敗文字，而不是一直停在 loading
    pub fill_unmatched: bool,
}

#[derive(Debug, Clone)]
pub struct PageTransition {
    pub state: PageSnapshot,
    pub patches: Vec<DomPatch>,
    /// 生成結果中找不到對應卡片的標題
    pub unmatched_titles: Vec<String>,
}

pub fn reduce(state: &PageSnapshot, event: &PageEvent, options: &PopulateOptions) -> PageTransition {
    let mut next = state.clone();
    let mut patches = Vec::new();
    let mut unmatched_titles = Vec::new();

    match event {
        PageEvent::ContentGenerated(content) => {
            next.tagline = SlotState::Ready(content.tagline.clone());
            patches.extend(fill(NodeTarget::id(TAGLINE_ID), &content.tagline));

            for item in &content.service_descriptions {
                match next.cards.iter_mut().find(|card| card.title == item.title) {
                    Some(card) => {
                        card.description = SlotState::Ready(item.description.clone());
                        patches.extend(fill(
                            NodeTarget::CardDescription(item.title.clone()),
                            &item.description,
                        ));
                    }
                    None => unmatched_titles.push(item.title.clone()),
                }
            }

            if options.fill_unmatched {
                for card in next.cards.iter_mut().filter(|card| card.description.is_loading()) {
                    card.description = SlotState::Failed(DESCRIPTION_FAILURE.to_string());
                    patches.extend(fill(
                        NodeTarget::CardDescription(card.title.clone()),
                        DESCRIPTION_FAILURE,
                    ));
                }
            }
        }
        PageEvent::GenerationFailed => {
            next.tagline = SlotState::Failed(FALLBACK_TAGLINE.to_string());
            patches.extend(fill(NodeTarget::id(TAGLINE_ID), FALLBACK_TAGLINE));

            for card in next.cards.iter_mut() {
                card.description = SlotState::Failed(DESCRIPTION_FAILURE.to_string());
                patches.extend(fill(
                    NodeTarget::CardDescription(card.title.clone()),
                    DESCRIPTION_FAILURE,
                ));
            }
        }
    }

    PageTransition {
        state: next,
        patches,
        unmatched_titles,
    }
}

fn fill(target: NodeTarget, text: &str) -> [DomPatch; 2] {
    [
        DomPatch::SetText {
            target: target.clone(),
            text: text.to_string(),
        },
        DomPatch::RemoveClass {
            target,
            class: LOADING_PLACEHOLDER.to_string(),
        },
    ]
}
