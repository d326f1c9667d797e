use formwork_core::Result;

/// Build the topology and run the full validation pass without emitting
/// a template
pub fn execute() -> Result<()> {
    let stack = crate::topology::storage_app()?;
    stack.validate()?;
    println!(
        "stack '{}' is valid: {} resources, {} outputs",
        stack.name(),
        stack.resource_count(),
        stack.outputs().len()
    );
    Ok(())
}
