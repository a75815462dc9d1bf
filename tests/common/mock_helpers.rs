//! Mock construction helpers

use flowcode_rs::{PlotSeries, Renderer};
use mockall::mock;

mock! {
    pub Chart {}

    impl Renderer for Chart {
        fn render(&mut self, series: &PlotSeries);
        fn clear(&mut self);
    }
}

/// A renderer mock that accepts any number of renders and clears
pub fn permissive_chart() -> MockChart {
    let mut renderer = MockChart::new();
    renderer.expect_render().return_const(());
    renderer.expect_clear().return_const(());
    renderer
}
