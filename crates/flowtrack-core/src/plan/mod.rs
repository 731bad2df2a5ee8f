//! Plan - タスクの順位付けと今日のプラン生成
//!
//! - **ranking**: priority / urgency のランクと 2 種類の並び順（focus 用・plan 用）
//! - **builder**: 未完了タスク上位 N 件 + tip の DailyPlan
//! - **tips**: tip の抽出・整形と fallback
//! - **focus**: focus リストと検索

pub mod builder;
pub mod focus;
pub mod ranking;
pub mod tips;

pub use self::builder::{DailyPlan, PlanBuilder, PlanItem, format_deadline};
pub use self::focus::{focus_list, search};
pub use self::ranking::{
    compare_for_plan, focus_order, focus_rank, plan_order, priority_rank, urgency_rank,
};
pub use self::tips::{FALLBACK_TIPS, clean_tip, extract_tips, tip_pool};
