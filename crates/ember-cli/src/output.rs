use ember_common::{AcceleratorProfile, EnvironmentDescriptor, EnvironmentHandle, ModelEntry};

pub fn print_models(models: &[ModelEntry]) {
    println!("\n=== Ember Models ===\n");
    if models.is_empty() {
        println!("No models registered.");
        return;
    }
    println!("{:<20} {:<15} {:>10}", "Model", "Accelerator", "Size (GB)");
    println!("{:-<47}", "");
    for m in models {
        println!(
            "{:<20} {:<15} {:>10.1}",
            m.identifier,
            m.accelerator.to_string(),
            m.approx_size_gb
        );
    }
    println!();
}

pub fn print_resolved(model: &str, accelerator: &AcceleratorProfile) {
    println!("{model}: {accelerator}");
}

pub fn print_descriptor(d: &EnvironmentDescriptor) {
    println!("\n=== Environment Descriptor ===\n");
    println!("  App:          {}", d.app_name);
    println!("  Model:        {}", d.model);
    println!("  Accelerator:  {}", d.accelerator);
    println!(
        "  Volume:       {} -> {}",
        d.storage_mount.volume,
        d.storage_mount.mount_path.display()
    );
    println!("  Port:         {}", d.http_port);
    println!(
        "  Instances:    max {} parallel, {} kept warm",
        d.max_parallel_instances, d.idle_instance_floor
    );
    println!("  Concurrency:  {} requests", d.max_concurrent_requests);
    println!("  Timeouts:     request {}, startup {}", secs(d.request_timeout), secs(d.startup_timeout));

    let secrets: Vec<&str> = d.injected_secrets.iter().map(String::as_str).collect();
    println!("  Secrets:      {}", secrets.join(", "));

    if !d.environment.is_empty() {
        println!("  Env:");
        for (k, v) in &d.environment {
            println!("    {k}={v}");
        }
    }
    println!();
}

pub fn print_deployed(handle: &EnvironmentHandle) {
    println!("✓ {} requested: {}", handle.app_name, handle.locator);
}

fn secs(d: std::time::Duration) -> String {
    format!("{}s", d.as_secs())
}
