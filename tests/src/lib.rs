//! Cross-crate tests exercising patterns from parsing through simulation.

#[cfg(test)]
mod language_properties;
#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod text_documents;
