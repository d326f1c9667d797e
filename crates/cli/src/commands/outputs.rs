use formwork_core::Result;

/// Print the declared outputs with their source expressions
///
/// Values stay deferred until the engine provisions, so deferred outputs
/// render as `${resource.attribute}` placeholders.
pub fn execute() -> Result<()> {
    let stack = crate::topology::storage_app()?;
    stack.validate()?;

    for (name, value) in stack.outputs() {
        println!("{name} = {value}");
    }

    Ok(())
}
