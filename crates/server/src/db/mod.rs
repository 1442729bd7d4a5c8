pub mod pool;
pub mod repertoires;
