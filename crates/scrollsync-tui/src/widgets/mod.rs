mod carousel;
mod page_view;
mod status_bar;

pub use carousel::CarouselWidget;
pub use page_view::PageWidget;
pub use status_bar::StatusBarWidget;
