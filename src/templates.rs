//! Built-in `.gitignore` templates used when the remote template can't be fetched.

pub const DEFAULT: &str = "
# IDE files
.idea/
.vscode/
*.swp
*.swo
*~

# OS files
.DS_Store
Thumbs.db
";

const PYTHON: &str = "
# Python
__pycache__/
*.py[cod]
*$py.class
*.so
.Python
env/
build/
develop-eggs/
dist/
downloads/
eggs/
.eggs/
lib/
lib64/
parts/
sdist/
var/
*.egg-info/
.installed.cfg
*.egg
.pytest_cache/
.coverage
htmlcov/
.tox/
.venv/
venv/
ENV/
";

const NODE: &str = "
# Node.js
node_modules/
npm-debug.log
yarn-debug.log
yarn-error.log
package-lock.json
.npm
.node_repl_history
.env
.env.test
.cache
.next
.nuxt
dist/
";

const JAVA: &str = "
# Java
*.class
*.log
*.jar
*.war
*.ear
*.zip
*.tar.gz
*.rar
hs_err_pid*
.mtj.tmp/
target/
.idea/
*.iml
.classpath
.project
.settings/
bin/
";

pub fn builtin(kind: &str) -> Option<&'static str> {
    match kind {
        "Python" => Some(PYTHON),
        "Node" => Some(NODE),
        "Java" => Some(JAVA),
        _ => None,
    }
}
