//! Cross-subsystem integration flows.

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod rating_flows;
#[cfg(test)]
mod read_flows;
