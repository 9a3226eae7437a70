use crate::presenter::RenderModel;

pub mod predict_viewer;

pub enum GuiEvent {
    Rendered(Box<RenderModel>),
}
