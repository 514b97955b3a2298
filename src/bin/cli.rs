use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataFrame};
use project_accessor::{
    FileAccessor, NewResource, NewTask, RecordId, ResourceCategory, ResourceQuery, ResourceView,
    export_resources_to_csv, export_tasks_to_csv, logging, resources_frame, tasks_frame,
};
use std::io::{self, Write};
use std::process::ExitCode;

fn parse_id_list(s: &str) -> Option<Vec<RecordId>> {
    s.split(',')
        .map(|p| p.trim().parse::<RecordId>().ok())
        .collect()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, values: &[String]| {
        out.push('|');
        for (ci, s) in values.iter().enumerate() {
            out.push(' ');
            out.push_str(s);
            out.push_str(&" ".repeat(widths[ci].saturating_sub(s.len())));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                                          Show this help\n  tasks                                         List tasks in outline order\n  resources                                     List resources\n  add-task <name> <start> <finish> <warehouse> <manager> [parent_id]\n                                                Append a task (dates YYYY-MM-DD)\n  add-resource <name> <category> <warehouse> [key=value...]\n                                                Append a resource; keys: diameter, pitch,\n                                                center_to_center, model, max, note\n  assign <task_id> <resource_ids_csv>           Assign resources to a task (e.g. 1,2)\n  delete-task <id>                              Delete a task and its subtasks\n  delete-resource <id>                          Delete a resource\n  avail <resource_id> <start> <end>             Check resource availability\n  query [key=value...]                          Filter resources; keys: category, warehouse,\n                                                min_diameter, max_diameter, pitch,\n                                                center_to_center, model, start, end\n  export <tasks|resources> <path>               Write a CSV export\n  save                                          Save the document\n  quit|exit                                     Save, close and exit"
    );
}

fn show_tasks(accessor: &FileAccessor) {
    match accessor.list_tasks() {
        Ok(tasks) => match tasks_frame(&tasks) {
            Ok(df) => println!("{}", render_df_as_text_table(&df)),
            Err(e) => println!("Error rendering tasks: {}", e),
        },
        Err(e) => println!("Error: {}", e),
    }
}

fn show_resources(resources: &[ResourceView]) {
    match resources_frame(resources) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering resources: {}", e),
    }
}

fn parse_resource_options(
    mut resource: NewResource,
    options: &[&str],
) -> Result<NewResource, String> {
    for option in options {
        let (key, value) = option
            .split_once('=')
            .ok_or_else(|| format!("Expected key=value, got '{}'", option))?;
        let number = || {
            value
                .parse::<f64>()
                .map_err(|_| format!("Invalid number for {}: '{}'", key, value))
        };
        resource = match key {
            "diameter" => resource.with_diameter(number()?),
            "pitch" => resource.with_pitch(number()?),
            "center_to_center" | "c2c" => resource.with_center_to_center(number()?),
            "max" => resource.with_max(number()?),
            "model" => resource.with_model(value),
            "note" | "notes" => resource.with_note(value),
            other => return Err(format!("Unknown resource option '{}'", other)),
        };
    }
    Ok(resource)
}

fn parse_query(options: &[&str]) -> Result<ResourceQuery, String> {
    let mut query = ResourceQuery::new();
    for option in options {
        let (key, value) = option
            .split_once('=')
            .ok_or_else(|| format!("Expected key=value, got '{}'", option))?;
        let number = || {
            value
                .parse::<f64>()
                .map_err(|_| format!("Invalid number for {}: '{}'", key, value))
        };
        let date = || {
            parse_date(value).ok_or_else(|| format!("Invalid date for {}: '{}'", key, value))
        };
        match key {
            "category" => {
                let category = value
                    .parse::<ResourceCategory>()
                    .map_err(|e| e.to_string())?;
                query.category = Some(category);
            }
            "warehouse" => query.warehouse = Some(value.to_string()),
            "min_diameter" => query.min_diameter = Some(number()?),
            "max_diameter" => query.max_diameter = Some(number()?),
            "pitch" => query.pitch = Some(number()?),
            "center_to_center" | "c2c" => query.center_to_center = Some(number()?),
            "model" => query.model = Some(value.to_string()),
            "start" => query.start = Some(date()?),
            "end" => query.end = Some(date()?),
            other => return Err(format!("Unknown query key '{}'", other)),
        }
    }
    Ok(query)
}

fn main() -> ExitCode {
    logging::init_logging();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "project.json".to_string());
    let mut accessor = match FileAccessor::open_or_create(&path) {
        Ok(accessor) => accessor,
        Err(e) => {
            eprintln!("Could not open {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    println!("Project Accessor (CLI) - {} - type 'help' for commands\n", path);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0];
        let args = &parts[1..];

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "tasks" => show_tasks(&accessor),
            "resources" => match accessor.list_resources() {
                Ok(resources) => show_resources(&resources),
                Err(e) => println!("Error: {}", e),
            },
            "add-task" => match args {
                [name, start, finish, warehouse, manager, rest @ ..] if rest.len() <= 1 => {
                    let (Some(start), Some(finish)) = (parse_date(start), parse_date(finish))
                    else {
                        println!("Invalid date (YYYY-MM-DD)");
                        continue;
                    };
                    let mut task = NewTask::new(*name, start, finish, *warehouse, *manager);
                    if let Some(parent) = rest.first() {
                        match parent.parse::<RecordId>() {
                            Ok(parent) => task = task.with_parent(parent),
                            Err(_) => {
                                println!("Invalid parent_id");
                                continue;
                            }
                        }
                    }
                    match accessor.append_task(task) {
                        Ok(id) => {
                            println!("Added task {}.", id);
                            show_tasks(&accessor);
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!(
                    "Usage: add-task <name> <start> <finish> <warehouse> <manager> [parent_id]"
                ),
            },
            "add-resource" => match args {
                [name, category, warehouse, options @ ..] => {
                    let resource = NewResource::new(*name, *category, *warehouse);
                    match parse_resource_options(resource, options) {
                        Ok(resource) => match accessor.append_resource(resource) {
                            Ok(id) => println!("Added resource {}.", id),
                            Err(e) => println!("Error: {}", e),
                        },
                        Err(message) => println!("{}", message),
                    }
                }
                _ => println!("Usage: add-resource <name> <category> <warehouse> [key=value...]"),
            },
            "assign" => match args {
                [task, resources] => {
                    let (Ok(task), Some(resources)) =
                        (task.parse::<RecordId>(), parse_id_list(resources))
                    else {
                        println!("Invalid id");
                        continue;
                    };
                    match accessor.assign_resources(task, &resources) {
                        Ok(()) => {
                            println!("Assigned resources to task {}.", task);
                            show_tasks(&accessor);
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: assign <task_id> <resource_ids_csv>"),
            },
            "delete-task" => match args.first().map(|s| s.parse::<RecordId>()) {
                Some(Ok(id)) => match accessor.delete_task(id) {
                    Ok(()) => println!("Deleted task {}.", id),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(_)) => println!("Invalid id"),
                None => println!("Usage: delete-task <id>"),
            },
            "delete-resource" => match args.first().map(|s| s.parse::<RecordId>()) {
                Some(Ok(id)) => match accessor.delete_resource(id) {
                    Ok(()) => println!("Deleted resource {}.", id),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(_)) => println!("Invalid id"),
                None => println!("Usage: delete-resource <id>"),
            },
            "avail" => match args {
                [id, start, end] => {
                    let (Ok(id), Some(start), Some(end)) =
                        (id.parse::<RecordId>(), parse_date(start), parse_date(end))
                    else {
                        println!("Invalid id or date (YYYY-MM-DD)");
                        continue;
                    };
                    match accessor.check_availability(id, start, end) {
                        Ok(true) => println!("Resource {} is available.", id),
                        Ok(false) => println!("Resource {} is busy.", id),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: avail <resource_id> <start> <end>"),
            },
            "query" => match parse_query(args) {
                Ok(query) => match accessor.query(&query) {
                    Ok(resources) => show_resources(&resources),
                    Err(e) => println!("Error: {}", e),
                },
                Err(message) => println!("{}", message),
            },
            "export" => match args {
                ["tasks", path] => match accessor.list_tasks() {
                    Ok(tasks) => match export_tasks_to_csv(&tasks, path) {
                        Ok(()) => println!("Tasks exported to {}.", path),
                        Err(e) => println!("Error exporting tasks: {}", e),
                    },
                    Err(e) => println!("Error: {}", e),
                },
                ["resources", path] => match accessor.list_resources() {
                    Ok(resources) => match export_resources_to_csv(&resources, path) {
                        Ok(()) => println!("Resources exported to {}.", path),
                        Err(e) => println!("Error exporting resources: {}", e),
                    },
                    Err(e) => println!("Error: {}", e),
                },
                _ => println!("Usage: export <tasks|resources> <path>"),
            },
            "save" => match accessor.save() {
                Ok(()) => println!("Saved {}.", path),
                Err(e) => println!("Error saving: {}", e),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }

    match accessor.close() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error closing {}: {}", path, e);
            ExitCode::FAILURE
        }
    }
}
