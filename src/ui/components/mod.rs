pub mod activity_heatmap;
pub mod calendar_view;
pub mod confirm_dialog;
pub mod menu;
pub mod progress_bar;
pub mod stats_panel;
