/// Word store geometry, masking, fills and shadow registers.
pub mod store;
