// Form intake: field groups as the browser submits them, the validation gate,
// and the collector that shapes validated fields into a CvDocument.

pub mod collector;
pub mod fields;
pub mod handlers;
pub mod validation;
