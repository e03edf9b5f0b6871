//! Built-in study catalog
//!
//! The Puppet configuration-management study: each task exists in several
//! method variants, and the groups interleave a questionnaire after every
//! work task while counterbalancing the method order across participants.

use super::{CatalogFile, GroupDef, TaskDef};

fn work(
    id: &str,
    name: &str,
    description: &str,
    image: &str,
    method: &str,
    src_dir: &str,
    duration: u32,
) -> TaskDef {
    TaskDef::Work {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        method: method.to_string(),
        src_dir: src_dir.to_string(),
        duration: Some(duration),
        modules: None,
        manifest: None,
    }
}

fn question(id: &str, name: &str, task_dir: &str) -> TaskDef {
    TaskDef::Question {
        id: id.to_string(),
        name: name.to_string(),
        task_dir: task_dir.to_string(),
        question_file: None,
    }
}

fn group(name: &str, tasks: &[&str]) -> GroupDef {
    GroupDef {
        name: name.to_string(),
        tasks: tasks.iter().map(|s| s.to_string()).collect(),
    }
}

/// The default task and group definitions
pub fn catalog() -> CatalogFile {
    let tasks = vec![
        work(
            "task1a",
            "Task 1 method A",
            r#"
  Our development team has released the fresh new application called
  'calculator'. Our task is to write a Puppet module for this application to
  allow an automatic deployment and configuration on our server farm.
  'calculator' uses a JSON style configuration file.

  The Puppet module is almost complete. Your task is to define the missing
  configuration part(s). Therefore, you have to define the required Puppet
  code to write the requested configuration settings to the specified file.

  Write the configuration part for the Puppet module 'calculator' using the
  resource type 'file' together with an ERB template:
   - modules/calculator/manifests/config.pp
   - modules/calculator/templates/config.json.erb

  If you are unfamiliar with the resource type `file` or how to write a ERB
  template, read Chapter "File Resource Type" and Chapter "ERB Templates" in
  the Puppet guide before you start the task.
"#,
            "puppet-experiment-task1:xenial",
            "T1_method_A",
            "task1/T1_method_A",
            25,
        ),
        work(
            "task1b",
            "Task 1 method B",
            r#"
  Our development team has released the fresh new application called
  'calculator'. Our task is to write a Puppet module for this application to
  allow an automatic deployment and configuration on our server farm.
  'calculator' uses a JSON style configuration file.

  The Puppet module is almost complete. Your task is to define the missing
  configuration part(s). Therefore, you have to define the required Puppet
  code to write the requested configuration settings to the specified file.

  Write the configuration part for the Puppet module 'calculator' using the
  resource types 'kdbmount' and 'kdbkey' only:
   - modules/calculator/manifests/config.pp

  If you are unfamiliar with the concepts of Libelektra, read the Chapter
  "Libelektra: Kdbmount and Kdbkey" in the Puppet guide before you start the
  task.
"#,
            "puppet-experiment-task1:xenial",
            "T1_method_B",
            "task1/T1_method_B",
            18,
        ),
        work(
            "task2.1a",
            "Task 2.1 method A",
            r#"
  Our DNS server has some issues, so we want to avoid outages due to
  unresolvable hostnames. Therefore, we have to update/add some entries in
  the hosts file.

  Update/Add the hosts, as specified in the 'buildserver' class.

  Also, make sure only valid IP addresses are written to the hosts file.

  IMPORTANT: for technical reasons we have to modify the file '/etc/hosts_bs'
  instead of the real hosts file.

  For this task use the Puppet resource type 'host' only.

  If you are unfamiliar with the `host` resource type, read Chapter "host
  Resource Type" in the Puppet guide before you start your task.
"#,
            "puppet-experiment-task2.1:xenial",
            "T2.1_method_A",
            "task2.1/T2.1_method_A",
            14,
        ),
        work(
            "task2.1c",
            "Task 2.1 method C",
            r#"
  Our DNS server has some issues, so we want to avoid outages due to
  unresolvable hostnames. Therefore, we have to update/add some entries in
  the hosts file.

  Update/Add the hosts, as specified in the 'buildserver' class.

  Also, make sure only valid IP addresses are written to the hosts file.

  IMPORTANT: for technical reasons we have to modify the file '/etc/hosts_bs'
  instead of the real hosts file.

  For this task use the Puppet resource type 'augeas' only.

  If you are unfamiliar with the concepts of Augeas, please read Chapter
  "augeas Resource Type" in the Puppet guide before you start your task.
"#,
            "puppet-experiment-task2.1:xenial",
            "T2.1_method_C",
            "task2.1/T2.1_method_C",
            40,
        ),
        work(
            "task2.1d",
            "Task 2.1 method D",
            r#"
  Our DNS server has some issues, so we want to avoid outages due to
  unresolvable hostnames. Therefore, we have to update/add some entries in
  the hosts file.

  Update/Add the hosts, as specified in the 'buildserver' class.

  Also, make sure only valid IP addresses are written to the hosts file.

  IMPORTANT: for technical reasons we have to modify the file '/etc/hosts_bs'
  instead of the real hosts file.

  For this task use the Puppet resource types 'kdbmount' and 'kdbkey' only.

  If you are unfamiliar with the concepts of Libelektra, read the Chapter
  "Libelektra: Kdbmount and Kdbkey" in the Puppet guide before you start the
  task.
"#,
            "puppet-experiment-task2.1:xenial",
            "T2.1_method_D",
            "task2.1/T2.1_method_D",
            30,
        ),
        work(
            "task2.2a",
            "Task 2.2 method A",
            r#"
  Some of our team members use a Windows notebook for their daily work. To
  make sharing files easier, we want to add a Samba server. However, we do
  not want to replace the whole smb.conf file as Ubuntu has reasonable
  default settings. Therefore, we just want to manipulate those settings,
  which we have to.

  For this task use the Puppet resource type 'ini_setting' to modify the
  smb.conf file as described in 'modules/samba/manifests/config.pp'.

  If you are unfamiliar with the `ini_setting` resource type, read the
  Chapter "ini_setting Resource Type" in the Puppet guide before you start
  your task.
"#,
            "puppet-experiment-task2.2:xenial",
            "T2.2_method_A",
            "task2.2/T2.2_method_A",
            12,
        ),
        work(
            "task2.2c",
            "Task 2.2 method C",
            r#"
  Some of our team members use a Windows notebook for their daily work. To
  make sharing files easier, we want to add a Samba server. However, we do
  not want to replace the whole smb.conf file as Ubuntu has reasonable
  default settings. Therefore, we just want to manipulate those settings,
  which we have to.

  For this task use the Puppet resource type 'augeas' to modify the
  smb.conf file as described in 'modules/samba/manifests/config.pp'.

  If you are unfamiliar with the concepts of Augeas, please read Chapter
  "augeas Resource Type" in the Puppet guide before you start your task.
"#,
            "puppet-experiment-task2.2:xenial",
            "T2.2_method_C",
            "task2.2/T2.2_method_C",
            30,
        ),
        work(
            "task2.2d",
            "Task 2.2 method D",
            r#"
  Some of our team members use a Windows notebook for their daily work. To
  make sharing files easier, we want to add a Samba server. However, we do
  not want to replace the whole smb.conf file as Ubuntu has reasonable
  default settings. Therefore, we just want to manipulate those settings,
  which we have to.

  For this task use the Puppet resource types 'kdbmount' and 'kdbkey' to
  modify the smb.conf file as described in
  'modules/samba/manifests/config.pp'.

  If you are unfamiliar with the concepts of Libelektra, read the Chapter
  "Libelektra: Kdbmount and Kdbkey" in the Puppet guide before you start the
  task.
"#,
            "puppet-experiment-task2.2:xenial",
            "T2.2_method_D",
            "task2.2/T2.2_method_D",
            12,
        ),
        work(
            "task3.2a",
            "Task 3 method A",
            r#"
  A team member created a puppet module for the (fake) rubyhttp webserver,
  which is doing a good job for a while now. However, a newer version of
  'rubyhttp' was released with a new 'cache' feature. Therefore, we have to
  extend our 'rubyhttp' Puppet module, which allows us making use of this
  new feature.

  Extend the 'rubyhttp' Puppet module by two new parameters:
   - '$cache':
        Default value 'file', allowed values 'file' or 'memcached'
        Setting in '/etc/rubyhttp/rubyhttp.json': 'general/cache'

   - '$memcached_connection':
        Default value undef (we do not have value restrictions for this
        parameter)
        Setting in '/etc/rubyhttp/rubyhttp.json':
        'general/memcached_connection'
        (this should be ONLY INCLUDED if "$cache == 'memcached'" !!!

  The two new parameter are already used in 'manifests/site.pp'.

  If you are unfamiliar with the resource type `file` or how to write an ERB
  template, read Chapter "File Resource Type" and Chapter "ERB Templates" in
  the Puppet guide before you start the task.
"#,
            "puppet-experiment-task3.2:xenial",
            "T3.2_method_A",
            "task3.2/T3.2_method_A",
            12,
        ),
        work(
            "task3.2b",
            "Task 3 method B",
            r#"
  A team member created a puppet module for the (fake) rubyhttp webserver,
  which is doing a good job for a while now. However, a newer version of
  'rubyhttp' was released with a new 'cache' feature. Therefore, we have to
  extend our 'rubyhttp' Puppet module, which allows us making use of this
  new feature.

  Extend the 'rubyhttp' Puppet module by two new parameters:
   - '$cache':
        Default value 'file', allowed values 'file' or 'memcached'
        Setting in '/etc/rubyhttp/rubyhttp.json': 'general/cache'

   - '$memcached_connection':
        Default value undef (we do not have value restrictions for this
        parameter)
        Setting in '/etc/rubyhttp/rubyhttp.json':
        'general/memcached_connection'
        (this should be ONLY INCLUDED if "$cache == 'memcached'" !!!

  The two new parameter are already used in 'manifests/site.pp'.

  If you are unfamiliar with the concepts of Libelektra, read the Chapter
  "Libelektra: Kdbmount and Kdbkey" in the Puppet guide before you start the
  task.
"#,
            "puppet-experiment-task3.2:xenial",
            "T3.2_method_B",
            "task3.2/T3.2_method_B",
            12,
        ),
        question("q0", "task 0 questions", "task0"),
        question("q1", "task 1 questions", "task1"),
        question("q2.1", "task 2.1 questions", "task2.1"),
        question("q2.2", "task 2.2 questions", "task2.2"),
        question("q3.2", "task 3.2 questions", "task3.2"),
    ];

    let groups = vec![
        group(
            "g1",
            &[
                "q0",
                "task1a", "q1", "task1b", "q1",
                "task2.1a", "q2.1", "task2.1c", "q2.1", "task2.1d", "q2.1",
                "task2.2a", "q2.2", "task2.2c", "q2.2", "task2.2d", "q2.2",
                "task3.2a", "q3.2", "task3.2b", "q3.2",
            ],
        ),
        group(
            "g2",
            &[
                "q0",
                "task1b", "q1", "task1a", "q1",
                "task2.1d", "q2.1", "task2.1a", "q2.1", "task2.1c", "q2.1",
                "task2.2d", "q2.2", "task2.2a", "q2.2", "task2.2c", "q2.2",
                "task3.2b", "q3.2", "task3.2a", "q3.2",
            ],
        ),
        group(
            "g3",
            &[
                "q0",
                "task1a", "q1", "task1b", "q1",
                "task2.1c", "q2.1", "task2.1a", "q2.1", "task2.1d", "q2.1",
                "task2.2c", "q2.2", "task2.2a", "q2.2", "task2.2d", "q2.2",
                "task3.2a", "q3.2", "task3.2b", "q3.2",
            ],
        ),
        group(
            "g4",
            &[
                "q0",
                "task1b", "q1", "task1a", "q1",
                "task2.1d", "q2.1", "task2.1c", "q2.1", "task2.1a", "q2.1",
                "task2.2d", "q2.2", "task2.2c", "q2.2", "task2.2a", "q2.2",
                "task3.2b", "q3.2", "task3.2a", "q3.2",
            ],
        ),
    ];

    CatalogFile { tasks, groups }
}
