//! Modal sequencer test modules
