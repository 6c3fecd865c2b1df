use crate::services::sample_items::SampleItemsService;

#[derive(Default)]
pub struct DeskState {
    pub sample_items: SampleItemsService,
}
