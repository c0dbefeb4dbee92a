pub mod optimizer;

#[cfg(test)]
mod tests;
